//! Canonical paper record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a link attached to a paper.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Pdf,
    Abstract,
    Code,
    #[default]
    Other,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Pdf => "pdf",
            LinkType::Abstract => "abstract",
            LinkType::Code => "code",
            LinkType::Other => "other",
        }
    }
}

/// A link attached to a paper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub url: String,

    #[serde(rename = "type")]
    pub link_type: LinkType,

    #[serde(default)]
    pub title: String,
}

/// A normalized literature record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Paper {
    /// Feed identifier, possibly with a `vN` suffix
    pub id: String,

    /// Whitespace-normalized title
    pub title: String,

    /// Whitespace-normalized abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Author names in feed order
    #[serde(default)]
    pub authors: Vec<String>,

    /// Category terms in feed order (e.g. cs.AI)
    #[serde(default)]
    pub categories: Vec<String>,

    /// Last revision timestamp
    pub updated_at: DateTime<Utc>,

    /// First submission timestamp
    #[serde(default)]
    pub published_at: DateTime<Utc>,

    /// Author comments (empty when absent)
    #[serde(default)]
    pub comments: String,

    /// DOI (empty when absent)
    #[serde(default)]
    pub doi: String,

    /// Journal reference (empty when absent)
    #[serde(default)]
    pub journal_ref: String,

    #[serde(default)]
    pub links: Vec<Link>,

    /// Quality score, set only on papers that passed filtering
    #[serde(default)]
    pub score: u8,

    /// Score contributions, set only on papers that passed filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub score_details: Vec<String>,
}

impl Paper {
    /// Revision number derived from the identifier.
    pub fn version(&self) -> u32 {
        version_of(&self.id)
    }

    /// Abstract page URL on arXiv.
    pub fn abs_url(&self) -> String {
        format!("https://arxiv.org/abs/{}", self.id)
    }

    /// PDF URL on arXiv.
    pub fn pdf_url(&self) -> String {
        format!("https://arxiv.org/pdf/{}.pdf", self.id)
    }

    /// Links of a given type.
    pub fn links_of(&self, link_type: LinkType) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.link_type == link_type)
    }
}

/// Parse the revision number out of an identifier.
///
/// Takes the digits right after the last `v`; anything missing, unparseable or zero
/// yields 1. `"2301.00001v2"` → 2, `"cs/0001001v3"` → 3, `"2301.00001"` → 1.
pub fn version_of(id: &str) -> u32 {
    let Some(pos) = id.rfind('v') else {
        return 1;
    };

    let digits: String = id[pos + 1..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => 1,
    }
}
