//! Raw feed records, as decoded from the Atom response before normalization.

/// One `<entry>` element of the feed. Text fields are kept exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub published: String,
    pub updated: String,
    pub authors: Vec<RawAuthor>,
    pub categories: Vec<RawCategory>,
    pub links: Vec<RawLink>,
    pub comment: String,
    pub journal_ref: String,
    pub doi: String,
}

/// `<author><name>..</name></author>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAuthor {
    pub name: String,
}

/// `<category term=".."/>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCategory {
    pub term: String,
}

/// `<link href=".." rel=".." type=".." title=".."/>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLink {
    pub href: String,
    pub rel: String,
    pub mime_type: String,
    pub title: String,
}
