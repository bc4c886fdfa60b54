//! Placeholder token generation
//!
//! Tokens have the fixed wire shape `<PII:{LABEL}:{id}>` where `id` is eight
//! lowercase hex digits drawn from a CSPRNG-seeded generator. The delimiters
//! guarantee that two distinct tokens never overlap as substrings.

use crate::anonymization::models::PiiCategory;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::sync::OnceLock;

/// Token prefix
pub const TOKEN_PREFIX: &str = "<PII:";

/// Length of the random identifier in hex digits
pub const TOKEN_ID_LEN: usize = 8;

/// Generates placeholder tokens for one anonymization call
pub struct TokenGenerator {
    rng: rand::rngs::StdRng,
}

impl TokenGenerator {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: rand::rngs::StdRng::from_entropy(),
        }
    }

    /// Create a deterministic generator (tests only need reproducible ids)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }

    /// Produce a fresh token for `category`
    pub fn generate(&mut self, category: PiiCategory) -> String {
        let id: u32 = self.rng.gen();
        format!("{TOKEN_PREFIX}{}:{id:08x}>", category.label())
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pattern matching any token-shaped substring
pub fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<PII:[A-Z_]+:[0-9a-f]{8}>").expect("token pattern should compile")
    })
}

/// Whether `value` is exactly one token
pub fn is_token(value: &str) -> bool {
    token_pattern()
        .find(value)
        .is_some_and(|m| m.start() == 0 && m.end() == value.len())
}
