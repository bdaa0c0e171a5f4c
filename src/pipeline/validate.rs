// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::services::validation::{ValidationSummary, validate_papers};
use crate::storage::PaperStorage;
use crate::utils::console;

/// Page size used while walking the store.
const PAGE: usize = 500;

/// Validate configuration, then every stored paper.
pub async fn run_validate(config: &Config, store: &dyn PaperStorage) -> Result<ValidationSummary> {
    console::header("Validating configuration and stored papers");

    if let Err(e) = config.validate() {
        console::failure(&format!("Configuration invalid: {}", e));
        return Err(e);
    }
    console::success("Configuration OK");
    console::sub_item(&format!("Feed: {}", config.feed.base_url));
    console::sub_item(&format!("Timeout: {}s", config.feed.timeout_secs));
    console::sub_item(&format!("Max concurrent: {}", config.feed.max_concurrent));
    console::sub_item(&format!(
        "Filter: min score {}, max age {} days",
        config.filter.min_score, config.filter.max_age_days
    ));

    let mut summary = ValidationSummary::default();
    let mut offset = 0;
    loop {
        let page = store.list(PAGE, offset).await?;
        if page.is_empty() {
            break;
        }
        offset += page.len();

        let part = validate_papers(&page);
        summary.valid += part.valid;
        summary.invalid += part.invalid;
        summary.issues.extend(part.issues);
    }

    if summary.is_clean() {
        console::success(&format!("{} stored papers valid", summary.valid));
    } else {
        console::failure(&format!(
            "{} of {} stored papers invalid",
            summary.invalid,
            summary.valid + summary.invalid
        ));
        for issue in &summary.issues {
            console::sub_item(&format!("{:?} {}", issue.paper_id, issue));
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Paper;
    use crate::storage::LocalStorage;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_counts_stored_papers() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let good = Paper {
            id: "a".to_string(),
            title: "Alpha".to_string(),
            authors: vec!["John Doe".to_string()],
            updated_at: Utc::now(),
            ..Paper::default()
        };
        let no_authors = Paper {
            id: "b".to_string(),
            authors: Vec::new(),
            ..good.clone()
        };
        store.upsert_papers(&[good, no_authors]).await.unwrap();

        let summary = run_validate(&Config::default(), &store).await.unwrap();
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.issues[0].field, "Authors");
    }

    #[tokio::test]
    async fn test_invalid_config_stops_early() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let mut config = Config::default();
        config.feed.timeout_secs = 0;

        let err = run_validate(&config, &store).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
