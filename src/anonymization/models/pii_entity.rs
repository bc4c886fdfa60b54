//! PII entity data models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// PII category enumeration
///
/// Every detected span carries exactly one category. The category label is
/// part of the token wire format (`<PII:{LABEL}:{id}>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiCategory {
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// National identification numbers (PESEL)
    NationalId,
    /// Bank account numbers (NRB, IBAN)
    BankAccount,
    /// Person names
    Person,
    /// Places, geopolitical entities, facilities
    Location,
    /// Organization names
    Organization,
    /// Dates
    Date,
}

impl PiiCategory {
    /// All categories, in declaration order
    pub const ALL: [PiiCategory; 8] = [
        Self::Email,
        Self::Phone,
        Self::NationalId,
        Self::BankAccount,
        Self::Person,
        Self::Location,
        Self::Organization,
        Self::Date,
    ];

    /// Label used in tokens, logs and configuration
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::NationalId => "NATIONAL_ID",
            Self::BankAccount => "BANK_ACCOUNT",
            Self::Person => "PERSON",
            Self::Location => "LOCATION",
            Self::Organization => "ORGANIZATION",
            Self::Date => "DATE",
        }
    }

    /// Tie-break rank for spans with identical offsets (lower wins)
    ///
    /// Checksum-validated and structurally unambiguous categories outrank
    /// looser ones, so a valid PESEL is never claimed as a phone number.
    pub fn priority(&self) -> u8 {
        match self {
            Self::NationalId => 0,
            Self::BankAccount => 1,
            Self::Email => 2,
            Self::Phone => 3,
            Self::Date => 4,
            Self::Person => 5,
            Self::Organization => 6,
            Self::Location => 7,
        }
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PiiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EMAIL" | "EMAIL_ADDRESS" => Ok(Self::Email),
            "PHONE" | "PHONE_NUMBER" => Ok(Self::Phone),
            "NATIONAL_ID" | "PESEL" => Ok(Self::NationalId),
            "BANK_ACCOUNT" | "ACCOUNT" | "IBAN" | "NRB" => Ok(Self::BankAccount),
            "PERSON" | "NAME" => Ok(Self::Person),
            "LOCATION" => Ok(Self::Location),
            "ORGANIZATION" | "ORG" => Ok(Self::Organization),
            "DATE" => Ok(Self::Date),
            _ => Err(format!("Unknown PII category: {s}")),
        }
    }
}

/// Detection method used to identify PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Regex pattern matching
    Regex,
    /// Candidate pattern plus format or checksum validation
    Validated,
    /// Lookup against a loaded entity lexicon
    Lexicon,
}

/// A span of PII reported by a detector
///
/// Offsets are byte offsets into the scanned text, half-open `[start, end)`,
/// and `value` is the substring they cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSpan {
    /// Category of PII
    pub category: PiiCategory,
    /// Original substring
    pub value: String,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Detection method used
    pub detection_method: DetectionMethod,
}

impl DetectedSpan {
    /// Create a new detected span
    pub fn new(
        category: PiiCategory,
        value: impl Into<String>,
        start: usize,
        end: usize,
        detection_method: DetectionMethod,
    ) -> Self {
        Self {
            category,
            value: value.into(),
            start,
            end,
            detection_method,
        }
    }

    /// Build a span from a regex match
    pub fn from_match(
        category: PiiCategory,
        m: &regex::Match<'_>,
        detection_method: DetectionMethod,
    ) -> Self {
        Self::new(category, m.as_str(), m.start(), m.end(), detection_method)
    }

    /// Span length in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no text
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offsets as a range
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the span describes a real slice of `text`
    ///
    /// The range must be non-empty, in bounds, on char boundaries, and
    /// `value` must equal the slice it covers.
    pub fn is_consistent_with(&self, text: &str) -> bool {
        self.start < self.end
            && text.get(self.range()).is_some_and(|slice| slice == self.value)
    }
}
