//! Restoration mapping between placeholder tokens and original values
//!
//! A mapping is produced by exactly one anonymization call and consumed by
//! the matching restore. It is never merged, cached or persisted; callers
//! drop it when the call completes.

use crate::anonymization::models::PiiCategory;
use std::collections::BTreeMap;
use std::fmt;

/// One token's worth of restoration data
#[derive(Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Original substring replaced by the token
    pub original_value: String,
    /// Category of the span that introduced the token
    pub category: PiiCategory,
    /// Start offset of the first occurrence (informational)
    pub start: usize,
    /// End offset of the first occurrence (informational)
    pub end: usize,
    /// Number of accepted spans sharing this token
    pub occurrences: usize,
}

impl fmt::Debug for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingEntry")
            .field("original_value", &"[REDACTED]")
            .field("category", &self.category)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("occurrences", &self.occurrences)
            .finish()
    }
}

/// Per-call association of token strings to original values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestorationMapping {
    entries: BTreeMap<String, MappingEntry>,
}

impl RestorationMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a token
    pub fn get(&self, token: &str) -> Option<&MappingEntry> {
        self.entries.get(token)
    }

    /// Whether `token` was issued by this mapping's call
    pub fn contains_token(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Iterate over `(token, entry)` pairs in token order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingEntry)> {
        self.entries.iter().map(|(token, entry)| (token.as_str(), entry))
    }

    /// Distinct tokens per category
    pub fn counts_by_category(&self) -> BTreeMap<PiiCategory, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.category).or_insert(0) += 1;
        }
        counts
    }

    pub(crate) fn insert(&mut self, token: String, entry: MappingEntry) {
        self.entries.insert(token, entry);
    }

    pub(crate) fn record_repeat(&mut self, token: &str) {
        if let Some(entry) = self.entries.get_mut(token) {
            entry.occurrences += 1;
        }
    }

    /// Replace every occurrence of every known token with its original value
    ///
    /// Token-shaped substrings that this mapping did not issue are left as
    /// they are.
    pub fn restore(&self, text: &str) -> String {
        let mut restored = text.to_string();
        for (token, entry) in &self.entries {
            if restored.contains(token.as_str()) {
                restored = restored.replace(token.as_str(), &entry.original_value);
            }
        }
        restored
    }
}
