//! Quote record model.
//!
//! # Responsibility
//! - Define the canonical quote row stored in a collection's `quotes` table.
//! - Provide content/tag normalization used by the record editor.
//!
//! # Invariants
//! - `tag` is one whitespace-separated string; its tag set never has empty
//!   tokens.
//! - Inserted `content` is wrapped in double quotes with inner double quotes
//!   turned into single quotes, so it is never stored as an empty string.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer identifier of a quote inside one collection.
pub type QuoteId = i64;

/// One row of a collection's `quotes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub content: String,
    pub speaker: String,
    pub note: String,
    pub date: String,
    /// Whitespace-separated tag tokens, no canonical order.
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Quote {
    /// Returns the de-duplicated tag tokens of this quote.
    pub fn tag_set(&self) -> BTreeSet<String> {
        parse_tags(&self.tag)
    }

    /// Returns whether any of this quote's tags is in `tags`.
    pub fn has_any_tag(&self, tags: &BTreeSet<String>) -> bool {
        self.tag.split_whitespace().any(|token| tags.contains(token))
    }
}

/// Full field set submitted by an add or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteDraft {
    pub content: String,
    pub speaker: String,
    pub note: String,
    pub date: String,
    pub tag: String,
    pub link: Option<String>,
}

impl QuoteDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Snapshot of an existing quote, used as the starting point of an edit.
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            content: quote.content.clone(),
            speaker: quote.speaker.clone(),
            note: quote.note.clone(),
            date: quote.date.clone(),
            tag: quote.tag.clone(),
            link: quote.link.clone(),
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = speaker.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Returns whether every field is blank after trimming.
    pub fn is_blank(&self) -> bool {
        [
            self.content.as_str(),
            self.speaker.as_str(),
            self.note.as_str(),
            self.date.as_str(),
            self.tag.as_str(),
            self.link.as_deref().unwrap_or(""),
        ]
        .iter()
        .all(|value| value.trim().is_empty())
    }

    /// Validates the draft for insertion.
    ///
    /// # Errors
    /// - `ValidationError::EmptyRecord` when all fields are blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_blank() {
            return Err(ValidationError::EmptyRecord);
        }
        Ok(())
    }

    /// Builds a new quote: content is quote-normalized, other fields trimmed.
    pub fn into_new_quote(self, id: QuoteId) -> Quote {
        Quote {
            id,
            content: normalize_content(&self.content),
            speaker: self.speaker.trim().to_string(),
            note: self.note.trim().to_string(),
            date: self.date.trim().to_string(),
            tag: self.tag.trim().to_string(),
            link: normalize_link(self.link),
        }
    }

    /// Overwrites every field of `quote` with the trimmed draft values.
    ///
    /// Content is not re-quoted, so editing a stored quote leaves its
    /// wrapping untouched. Blank content is stored as the two-character
    /// string `""` (an empty quote pair), never as an empty string.
    pub fn overwrite(self, quote: &mut Quote) {
        let content = self.content.trim();
        quote.content = if content.is_empty() {
            normalize_content(content)
        } else {
            content.to_string()
        };
        quote.speaker = self.speaker.trim().to_string();
        quote.note = self.note.trim().to_string();
        quote.date = self.date.trim().to_string();
        quote.tag = self.tag.trim().to_string();
        quote.link = normalize_link(self.link);
    }
}

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Every field of the submitted record is blank.
    EmptyRecord,
    /// The same id appears twice in one table.
    DuplicateId(QuoteId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRecord => write!(f, "at least one field must be filled in"),
            Self::DuplicateId(id) => write!(f, "duplicate quote id {id}"),
        }
    }
}

impl Error for ValidationError {}

/// Wraps content in double quotes after turning inner `"` into `'`.
pub fn normalize_content(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "'").trim())
}

/// Splits a tag string into its de-duplicated token set.
pub fn parse_tags(raw: &str) -> BTreeSet<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Unions manually typed tokens with tokens picked from existing tags.
///
/// Duplicates collapse and blank tokens are dropped. The result is sorted
/// and space-joined.
pub fn merge_tags(manual: &str, selected: &[String]) -> String {
    let mut merged = parse_tags(manual);
    for value in selected {
        merged.extend(parse_tags(value));
    }
    merged.into_iter().collect::<Vec<_>>().join(" ")
}

fn normalize_link(link: Option<String>) -> Option<String> {
    link.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{merge_tags, normalize_content, parse_tags, QuoteDraft, ValidationError};

    #[test]
    fn content_is_wrapped_and_inner_quotes_become_single() {
        assert_eq!(
            normalize_content("  He said \"hi\"  "),
            "\"He said 'hi'\""
        );
    }

    #[test]
    fn blank_content_still_yields_non_empty_string() {
        assert_eq!(normalize_content("   "), "\"\"");
    }

    #[test]
    fn parse_tags_never_yields_empty_tokens() {
        let tags = parse_tags("  wisdom   fun\twisdom \n");
        assert_eq!(tags.len(), 2);
        assert!(tags.iter().all(|tag| !tag.is_empty()));
    }

    #[test]
    fn merge_tags_unions_and_collapses_duplicates() {
        let merged = merge_tags("b a  ", &["a".to_string(), " ".to_string(), "c".to_string()]);
        assert_eq!(merged, "a b c");
    }

    #[test]
    fn draft_with_only_speaker_is_valid() {
        let draft = QuoteDraft::default().with_speaker("Ann");
        assert!(draft.validate().is_ok());
        assert_eq!(
            QuoteDraft::new("   ").validate(),
            Err(ValidationError::EmptyRecord)
        );
    }

    #[test]
    fn new_quote_trims_fields_and_drops_blank_link() {
        let quote = QuoteDraft::new("x")
            .with_speaker("  Ann ")
            .with_link("   ")
            .into_new_quote(7);
        assert_eq!(quote.id, 7);
        assert_eq!(quote.speaker, "Ann");
        assert_eq!(quote.link, None);
    }
}
