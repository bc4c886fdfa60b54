//! National identification number detector (PESEL)

use super::PiiDetector;
use crate::anonymization::models::{DetectedSpan, DetectionMethod, PiiCategory};
use anyhow::{Context, Result};
use regex::Regex;

const PESEL_WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

/// Detects 11-digit PESEL numbers with a valid check digit
pub struct NationalIdDetector {
    candidate: Regex,
}

impl NationalIdDetector {
    /// Create a new PESEL detector
    pub fn new() -> Result<Self> {
        let candidate =
            Regex::new(r"\b[0-9]{11}\b").context("Failed to compile PESEL candidate pattern")?;
        Ok(Self { candidate })
    }

    /// Validate a PESEL number against its checksum
    ///
    /// Only the check digit is verified; the embedded birth date is not.
    pub fn is_valid_pesel(value: &str) -> bool {
        let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != 11 || value.len() != 11 {
            return false;
        }

        let checksum: u32 = digits
            .iter()
            .zip(PESEL_WEIGHTS)
            .map(|(digit, weight)| digit * weight)
            .sum();
        let control = (10 - checksum % 10) % 10;

        control == digits[10]
    }
}

impl PiiDetector for NationalIdDetector {
    fn name(&self) -> &'static str {
        "national_id"
    }

    fn detect(&self, text: &str) -> Vec<DetectedSpan> {
        self.candidate
            .find_iter(text)
            .filter(|m| Self::is_valid_pesel(m.as_str()))
            .map(|m| DetectedSpan::from_match(PiiCategory::NationalId, &m, DetectionMethod::Validated))
            .collect()
    }
}
