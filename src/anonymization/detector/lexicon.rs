//! Named-entity detector backed by a lexicon resource
//!
//! The lexicon is a TOML table of entity labels to surface forms. Labels use
//! the usual NER tag sets (`persName`, `PERSON`, `GPE`, `ORG`, ...) and are
//! mapped onto [`PiiCategory`]; unmapped labels are skipped. All surface
//! forms are compiled once into a single Aho-Corasick automaton, which is
//! immutable and shared by every request.
//!
//! ```toml
//! case_insensitive = true
//!
//! [entities]
//! persName = ["Jan Kowalski", "Anna Nowak"]
//! placeName = ["Kraków"]
//! ```

use super::PiiDetector;
use crate::anonymization::models::{DetectedSpan, DetectionMethod, PiiCategory};
use aho_corasick::{AhoCorasick, MatchKind};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    case_insensitive: bool,
    entities: BTreeMap<String, Vec<String>>,
}

/// Map an external entity label to a PII category
pub fn map_entity_label(label: &str) -> Option<PiiCategory> {
    match label {
        "persName" | "person" | "PERSON" | "PER" => Some(PiiCategory::Person),
        "orgName" | "org" | "ORG" | "ORGANIZATION" => Some(PiiCategory::Organization),
        "placeName" | "geogName" | "LOC" | "GPE" | "FAC" | "LOCATION" => {
            Some(PiiCategory::Location)
        }
        "date" | "DATE" => Some(PiiCategory::Date),
        _ => None,
    }
}

/// Entity detector matching whole words from a loaded lexicon
#[derive(Debug)]
pub struct EntityLexiconDetector {
    automaton: AhoCorasick,
    categories: Vec<PiiCategory>,
}

impl EntityLexiconDetector {
    /// Load a lexicon from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read entity lexicon: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Invalid entity lexicon: {}", path.display()))
    }

    /// Build a detector from TOML lexicon content
    pub fn from_toml(content: &str) -> Result<Self> {
        let lexicon: LexiconFile =
            toml::from_str(content).context("Failed to parse entity lexicon TOML")?;

        let mut terms = Vec::new();
        let mut categories = Vec::new();

        for (label, names) in lexicon.entities {
            let Some(category) = map_entity_label(&label) else {
                tracing::warn!(label = %label, "Skipping unmapped entity label");
                continue;
            };

            for name in names {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                terms.push(name.to_string());
                categories.push(category);
            }
        }

        if terms.is_empty() {
            anyhow::bail!("Entity lexicon contains no usable entries");
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .ascii_case_insensitive(lexicon.case_insensitive)
            .build(&terms)
            .context("Failed to build entity automaton")?;

        tracing::debug!(entries = terms.len(), "Entity lexicon loaded");

        Ok(Self {
            automaton,
            categories,
        })
    }

    /// Number of surface forms in the automaton
    pub fn entry_count(&self) -> usize {
        self.categories.len()
    }
}

impl PiiDetector for EntityLexiconDetector {
    fn name(&self) -> &'static str {
        "entity_lexicon"
    }

    fn detect(&self, text: &str) -> Vec<DetectedSpan> {
        if text.is_empty() {
            return Vec::new();
        }

        self.automaton
            .find_overlapping_iter(text)
            .filter(|m| is_whole_word(text, m.start(), m.end()))
            .map(|m| {
                DetectedSpan::new(
                    self.categories[m.pattern().as_usize()],
                    &text[m.start()..m.end()],
                    m.start(),
                    m.end(),
                    DetectionMethod::Lexicon,
                )
            })
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return false;
    }
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}
