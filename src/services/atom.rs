// src/services/atom.rs

//! Atom feed decoding.
//!
//! Reads the arXiv Atom response with a streaming `quick-xml` reader and collects the
//! `<entry>` elements into [`RawEntry`] values. Elements are matched by local name, so
//! `arxiv:comment` and `comment` are the same thing here. No cleanup happens at this
//! stage; that is the normalizer's job.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{AppError, Result};
use crate::models::{RawAuthor, RawCategory, RawEntry, RawLink};

/// Text-bearing entry children we capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    Updated,
    Comment,
    JournalRef,
    Doi,
    AuthorName,
}

impl Field {
    fn for_entry_child(name: &[u8]) -> Option<Self> {
        match name {
            b"id" => Some(Field::Id),
            b"title" => Some(Field::Title),
            b"summary" => Some(Field::Summary),
            b"published" => Some(Field::Published),
            b"updated" => Some(Field::Updated),
            b"comment" => Some(Field::Comment),
            b"journal_ref" => Some(Field::JournalRef),
            b"doi" => Some(Field::Doi),
            _ => None,
        }
    }
}

/// Decoder state while walking the document.
#[derive(Default)]
struct FeedState {
    depth: usize,
    saw_feed: bool,
    entries: Vec<RawEntry>,
    entry: Option<RawEntry>,
    entry_depth: usize,
    in_author: bool,
    field: Option<(Field, usize)>,
    text: String,
}

impl FeedState {
    fn open(&mut self, element: &BytesStart<'_>, is_empty: bool) -> Result<()> {
        let local = element.local_name();
        let name = local.as_ref();

        // `depth` already counts this element for start tags.
        let depth = if is_empty { self.depth + 1 } else { self.depth };

        if depth == 1 {
            if name != b"feed" {
                return Err(AppError::decode(format!(
                    "expected <feed> root element, found <{}>",
                    String::from_utf8_lossy(name)
                )));
            }
            self.saw_feed = true;
            return Ok(());
        }

        if self.entry.is_none() {
            if name == b"entry" && !is_empty {
                self.entry = Some(RawEntry::default());
                self.entry_depth = depth;
            }
            return Ok(());
        }

        let child_depth = self.entry_depth + 1;
        match name {
            b"category" if depth == child_depth => {
                let term = attribute(element, b"term")?.unwrap_or_default();
                self.current().categories.push(RawCategory { term });
            }
            b"link" if depth == child_depth => {
                let link = RawLink {
                    href: attribute(element, b"href")?.unwrap_or_default(),
                    rel: attribute(element, b"rel")?.unwrap_or_default(),
                    mime_type: attribute(element, b"type")?.unwrap_or_default(),
                    title: attribute(element, b"title")?.unwrap_or_default(),
                };
                self.current().links.push(link);
            }
            b"author" if depth == child_depth && !is_empty => {
                self.in_author = true;
                self.current().authors.push(RawAuthor::default());
            }
            b"name" if self.in_author && depth == child_depth + 1 && !is_empty => {
                self.begin_field(Field::AuthorName, depth);
            }
            _ if depth == child_depth && !is_empty => {
                if let Some(field) = Field::for_entry_child(name) {
                    self.begin_field(field, depth);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        if let Some((field, field_depth)) = self.field {
            if field_depth == self.depth {
                let text = std::mem::take(&mut self.text);
                self.store(field, text);
                self.field = None;
            }
        }

        if self.entry.is_some() {
            if name == b"author" && self.depth == self.entry_depth + 1 {
                self.in_author = false;
            } else if name == b"entry" && self.depth == self.entry_depth {
                if let Some(entry) = self.entry.take() {
                    self.entries.push(entry);
                }
                self.in_author = false;
            }
        }
    }

    fn begin_field(&mut self, field: Field, depth: usize) {
        self.field = Some((field, depth));
        self.text.clear();
    }

    fn push_text(&mut self, text: &str) {
        if self.field.is_some() {
            self.text.push_str(text);
        }
    }

    fn store(&mut self, field: Field, text: String) {
        let entry = self.current();
        match field {
            Field::Id => entry.id = text,
            Field::Title => entry.title = text,
            Field::Summary => entry.summary = text,
            Field::Published => entry.published = text,
            Field::Updated => entry.updated = text,
            Field::Comment => entry.comment = text,
            Field::JournalRef => entry.journal_ref = text,
            Field::Doi => entry.doi = text,
            Field::AuthorName => {
                if let Some(author) = entry.authors.last_mut() {
                    author.name = text;
                }
            }
        }
    }

    fn current(&mut self) -> &mut RawEntry {
        self.entry.get_or_insert_with(RawEntry::default)
    }
}

/// Read an attribute by local name, unescaped.
fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(AppError::decode)?;
        if attr.key.local_name().as_ref() == key {
            let value = attr.unescape_value().map_err(AppError::decode)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Decode an Atom document into raw entries.
///
/// Fails with [`AppError::Decode`] when the document is not well-formed, is truncated,
/// or has a root element other than `<feed>`.
pub fn parse_feed(xml: &str) -> Result<Vec<RawEntry>> {
    let mut reader = Reader::from_str(xml);
    let mut state = FeedState::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            AppError::decode(format!(
                "malformed XML at byte {}: {}",
                reader.error_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                state.depth += 1;
                state.open(&e, false)?;
            }
            Event::Empty(e) => state.open(&e, true)?,
            Event::End(e) => {
                state.close(e.local_name().as_ref());
                state.depth = state.depth.saturating_sub(1);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(AppError::decode)?;
                state.push_text(&text);
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                state.push_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !state.saw_feed {
        return Err(AppError::decode("missing <feed> root element"));
    }
    if state.depth != 0 || state.entry.is_some() {
        return Err(AppError::decode("unexpected end of document"));
    }

    Ok(state.entries)
}
