// src/services/validation.rs

//! Structural checks on normalized papers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Paper;

/// One failed check on one paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// ID of the offending paper (may itself be empty)
    pub paper_id: String,
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Batch outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub valid: usize,
    pub invalid: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationSummary {
    pub fn is_clean(&self) -> bool {
        self.invalid == 0
    }
}

/// Check one paper. Issues come back in field order: ID, Title, Authors, UpdatedAt.
pub fn validate_paper(paper: &Paper) -> Vec<ValidationIssue> {
    let issue = |field, message| ValidationIssue {
        paper_id: paper.id.clone(),
        field,
        message,
    };

    let mut issues = Vec::new();
    if paper.id.trim().is_empty() {
        issues.push(issue("ID", "cannot be empty"));
    }
    if paper.title.trim().is_empty() {
        issues.push(issue("Title", "cannot be empty"));
    }
    if paper.authors.is_empty() {
        issues.push(issue("Authors", "must have at least one author"));
    }
    if paper.updated_at == DateTime::<Utc>::default() {
        issues.push(issue("UpdatedAt", "cannot be zero"));
    }
    issues
}

pub fn is_valid(paper: &Paper) -> bool {
    validate_paper(paper).is_empty()
}

/// Check a batch and count valid and invalid papers.
pub fn validate_papers(papers: &[Paper]) -> ValidationSummary {
    let mut summary = ValidationSummary::default();
    for paper in papers {
        let issues = validate_paper(paper);
        if issues.is_empty() {
            summary.valid += 1;
        } else {
            summary.invalid += 1;
            summary.issues.extend(issues);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_paper(id: &str) -> Paper {
        Paper {
            id: id.to_string(),
            title: "Test Paper".to_string(),
            abstract_text: "Test abstract".to_string(),
            authors: vec!["John Doe".to_string()],
            updated_at: Utc::now(),
            ..Paper::default()
        }
    }

    #[test]
    fn test_valid_paper() {
        assert!(validate_paper(&valid_paper("2301.00001")).is_empty());
        assert!(is_valid(&valid_paper("2301.00001")));
    }

    #[test]
    fn test_empty_id() {
        let issues = validate_paper(&valid_paper("  "));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "ID");
        assert_eq!(issues[0].to_string(), "ID: cannot be empty");
    }

    #[test]
    fn test_no_authors() {
        let mut paper = valid_paper("2301.00001");
        paper.authors.clear();
        let issues = validate_paper(&paper);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "Authors");
    }

    #[test]
    fn test_epoch_timestamp_is_flagged() {
        let mut paper = valid_paper("2301.00001");
        paper.updated_at = DateTime::<Utc>::default();
        let issues = validate_paper(&paper);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "UpdatedAt");
    }

    #[test]
    fn test_every_field_reported() {
        let fields: Vec<_> = validate_paper(&Paper::default())
            .iter()
            .map(|i| i.field)
            .collect();
        assert_eq!(fields, vec!["ID", "Title", "Authors", "UpdatedAt"]);
    }

    #[test]
    fn test_batch_summary() {
        let mut papers = vec![valid_paper("1"), valid_paper(""), valid_paper("2")];
        papers[1].title = "Invalid".to_string();

        let summary = validate_papers(&papers);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.issues.len(), 1);
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_empty_batch_is_clean() {
        let summary = validate_papers(&[]);
        assert_eq!(summary, ValidationSummary::default());
        assert!(summary.is_clean());
    }
}
