//! Pure selection functions.
//!
//! # Invariants
//! - Results borrow from the input slice and keep its order unless stated.
//! - An empty or whitespace-only search query matches every row.

use crate::model::quote::Quote;
use crate::model::table::QuoteTable;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Picks one row uniformly at random; `None` for empty input.
pub fn random_pick<'a, R: Rng + ?Sized>(rows: &'a [Quote], rng: &mut R) -> Option<&'a Quote> {
    rows.choose(rng)
}

/// Include/exclude tag configuration used by random sampling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    /// When non-empty, rows must carry at least one of these tags.
    pub include: BTreeSet<String>,
    /// Rows carrying any of these tags are dropped.
    pub exclude: BTreeSet<String>,
}

impl TagFilter {
    /// Filter that lets every row through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Default-deny filter: every known tag starts excluded until opted in.
    pub fn default_deny(table: &QuoteTable) -> Self {
        Self {
            include: BTreeSet::new(),
            exclude: table.known_tags(),
        }
    }

    /// Adds `tag` to the include set.
    pub fn include(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let tag = tag.trim();
        if !tag.is_empty() {
            self.include.insert(tag.to_string());
        }
        self
    }

    /// Adds `tag` to the exclude set.
    pub fn exclude(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let tag = tag.trim();
        if !tag.is_empty() {
            self.exclude.insert(tag.to_string());
        }
        self
    }

    /// Takes `tag` back out of the exclude set.
    pub fn opt_in(mut self, tag: &str) -> Self {
        self.exclude.remove(tag.trim());
        self
    }

    /// `(include empty OR tags ∩ include ≠ ∅) AND tags ∩ exclude = ∅`
    pub fn matches(&self, quote: &Quote) -> bool {
        tags_match(quote, &self.include, &self.exclude)
    }

    pub fn apply<'a>(&self, rows: &'a [Quote]) -> Vec<&'a Quote> {
        filter_by_tags(rows, &self.include, &self.exclude)
    }
}

/// Keeps rows passing the include/exclude tag predicate.
pub fn filter_by_tags<'a>(
    rows: &'a [Quote],
    include: &BTreeSet<String>,
    exclude: &BTreeSet<String>,
) -> Vec<&'a Quote> {
    rows.iter()
        .filter(|quote| tags_match(quote, include, exclude))
        .collect()
}

/// Random pick restricted to rows passing `filter`.
pub fn random_pick_filtered<'a, R: Rng + ?Sized>(
    rows: &'a [Quote],
    filter: &TagFilter,
    rng: &mut R,
) -> Option<&'a Quote> {
    filter.apply(rows).choose(rng).copied()
}

/// Case-insensitive substring search over `content` and `tag`.
///
/// An empty or whitespace-only `text` matches every row. Any other query is
/// matched as given, surrounding spaces included.
pub fn search<'a>(rows: &'a [Quote], text: &str) -> Vec<&'a Quote> {
    if text.trim().is_empty() {
        return rows.iter().collect();
    }
    let needle = text.to_lowercase();

    rows.iter()
        .filter(|quote| {
            quote.content.to_lowercase().contains(&needle)
                || quote.tag.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Rows whose trimmed, lowercased content occurs more than once.
///
/// Groups are ordered by normalized content; rows inside a group keep table
/// order.
pub fn find_duplicates(rows: &[Quote]) -> Vec<&Quote> {
    let mut groups: BTreeMap<String, Vec<&Quote>> = BTreeMap::new();
    for quote in rows {
        groups
            .entry(duplicate_key(&quote.content))
            .or_default()
            .push(quote);
    }

    groups
        .into_values()
        .filter(|group| group.len() >= 2)
        .flatten()
        .collect()
}

/// Normalized content used to detect duplicates.
pub fn duplicate_key(content: &str) -> String {
    content.trim().to_lowercase()
}

fn tags_match(quote: &Quote, include: &BTreeSet<String>, exclude: &BTreeSet<String>) -> bool {
    (include.is_empty() || quote.has_any_tag(include)) && !quote.has_any_tag(exclude)
}
