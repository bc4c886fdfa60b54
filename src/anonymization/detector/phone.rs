//! Telephone number detector
//!
//! A loose candidate pattern finds digit runs with the usual separators.
//! Each candidate is trimmed and then shortened group by group until it
//! matches a dialable shape: a Polish 9-digit number, an international
//! `+`/`00` number within E.164 limits, or a 3-3-4 North American number.

use super::PiiDetector;
use crate::anonymization::models::{DetectedSpan, DetectionMethod, PiiCategory};
use anyhow::{Context, Result};
use regex::Regex;

const CANDIDATE_PATTERN: &str = r"\+?\(?[0-9][0-9 \t\-()]{7,}";

/// Default minimum digit count (Polish subscriber numbers are 9 digits)
pub const DEFAULT_MIN_DIGITS: usize = 9;

/// Default maximum digit count (E.164 limit)
pub const DEFAULT_MAX_DIGITS: usize = 15;

const POLAND_COUNTRY_CODE: &str = "48";
const NATIONAL_DIGITS: usize = 9;
const E164_MIN_DIGITS: usize = 8;
const E164_MAX_DIGITS: usize = 15;

/// Validated-format phone number detector
pub struct PhoneDetector {
    candidate: Regex,
    min_digits: usize,
    max_digits: usize,
}

impl PhoneDetector {
    /// Create a detector with the default digit bounds
    pub fn new() -> Result<Self> {
        Self::with_digit_bounds(DEFAULT_MIN_DIGITS, DEFAULT_MAX_DIGITS)
    }

    /// Create a detector accepting numbers with `min..=max` digits
    pub fn with_digit_bounds(min_digits: usize, max_digits: usize) -> Result<Self> {
        if min_digits == 0 || min_digits > max_digits {
            anyhow::bail!(
                "Invalid phone digit bounds: min {min_digits}, max {max_digits}"
            );
        }

        let candidate =
            Regex::new(CANDIDATE_PATTERN).context("Failed to compile phone candidate pattern")?;

        Ok(Self {
            candidate,
            min_digits,
            max_digits,
        })
    }

    fn is_valid(&self, candidate: &str) -> bool {
        let groups = digit_groups(candidate);
        let digits: String = groups.concat();

        (self.min_digits..=self.max_digits).contains(&digits.len())
            && balanced_parentheses(candidate)
            && has_dialable_shape(candidate, &groups, &digits)
    }

    /// Longest prefix of `candidate`, cut at a digit group boundary, that
    /// validates
    fn longest_valid_prefix<'t>(&self, candidate: &'t str) -> Option<&'t str> {
        let mut ends: Vec<usize> = candidate
            .char_indices()
            .filter(|(i, c)| {
                c.is_ascii_digit()
                    && !candidate[i + 1..]
                        .chars()
                        .next()
                        .is_some_and(|n| n.is_ascii_digit())
            })
            .map(|(i, _)| i + 1)
            .collect();
        ends.reverse();

        ends.into_iter().find_map(|end| {
            // A closing parenthesis directly after the group belongs to it
            let end = if candidate[end..].starts_with(')') {
                end + 1
            } else {
                end
            };
            let prefix = &candidate[..end];
            self.is_valid(prefix).then_some(prefix)
        })
    }
}

impl PiiDetector for PhoneDetector {
    fn name(&self) -> &'static str {
        "phone"
    }

    fn detect(&self, text: &str) -> Vec<DetectedSpan> {
        let mut spans = Vec::new();

        for matched in self.candidate.find_iter(text) {
            // Glued to a word ("ID123456789") is not a phone number
            if text[..matched.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
            {
                continue;
            }

            let raw = matched.as_str();
            let trimmed = raw.trim_end_matches([' ', '\t', '-', '(']);
            let Some(trimmed) = self.longest_valid_prefix(trimmed) else {
                continue;
            };

            let start = matched.start();
            spans.push(DetectedSpan::new(
                PiiCategory::Phone,
                trimmed,
                start,
                start + trimmed.len(),
                DetectionMethod::Validated,
            ));
        }

        spans
    }
}

fn digit_groups(candidate: &str) -> Vec<&str> {
    candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| !group.is_empty())
        .collect()
}

fn has_dialable_shape(candidate: &str, groups: &[&str], digits: &str) -> bool {
    let international = if candidate.starts_with('+') {
        Some(digits)
    } else {
        digits.strip_prefix("00")
    };

    if let Some(number) = international {
        return match number.strip_prefix(POLAND_COUNTRY_CODE) {
            Some(national) => national.len() == NATIONAL_DIGITS && !national.starts_with('0'),
            None => {
                (E164_MIN_DIGITS..=E164_MAX_DIGITS).contains(&number.len())
                    && !number.starts_with('0')
            }
        };
    }

    // Domestic: 601234567, 601 234 567, (22) 621 10 00
    let domestic = digits.len() == NATIONAL_DIGITS
        && !digits.starts_with('0')
        && (groups.len() == 1 || groups.iter().all(|g| (2..=3).contains(&g.len())));

    // North American: 123-456-7890, (123) 456-7890
    let lengths: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    let north_american = lengths == [3, 3, 4];

    domestic || north_american
}

fn balanced_parentheses(candidate: &str) -> bool {
    let mut depth = 0i32;
    for c in candidate.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn values(text: &str) -> Vec<String> {
        PhoneDetector::new()
            .unwrap()
            .detect(text)
            .into_iter()
            .map(|s| s.value)
            .collect()
    }

    #[test_case("Call 123-456-7890 or email" ; "dashed")]
    #[test_case("Zadzwoń: +48 601 234 567" ; "international")]
    #[test_case("Tel. (22) 621 10 00 w godzinach pracy" ; "area code")]
    #[test_case("numer 601234567." ; "compact")]
    fn test_detects_phone(text: &str) {
        assert_eq!(values(text).len(), 1, "no phone found in {text:?}");
    }

    #[test]
    fn test_trailing_separators_trimmed() {
        let text = "Call 123-456-7890 or email foo@bar.com";
        let spans = PhoneDetector::new().unwrap().detect(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].value, "123-456-7890");
        assert_eq!(spans[0].range(), 5..17);
        assert!(spans[0].is_consistent_with(text));
    }

    #[test_case("Order 1234-56 shipped" ; "too few digits")]
    #[test_case("Konto 61 1090 1014 0000 0712 1981 2874" ; "too many digits")]
    #[test_case("Kod ID123456789 aktywny" ; "glued to word")]
    #[test_case("Born 1984-02-29" ; "date")]
    fn test_rejects_non_phone(text: &str) {
        assert!(values(text).is_empty(), "unexpected phone in {text:?}");
    }

    #[test]
    fn test_custom_bounds() {
        let detector = PhoneDetector::with_digit_bounds(10, 10).unwrap();
        assert_eq!(detector.detect("Call 123-456-7890").len(), 1);
        assert!(detector.detect("tel. 601 234 567").is_empty());
    }

    #[test_case("Spotkanie 2024-03-15 10:30" ; "date followed by time")]
    #[test_case("PESEL 44051401359 12 lat" ; "pesel followed by number")]
    #[test_case("Faktura 2024 0315 1030 77" ; "grouped digit run")]
    #[test_case("tel. 060 123 456 7" ; "leading zero")]
    #[test_case("+48 601 234 56" ; "short polish international")]
    fn test_rejects_undialable_digit_runs(text: &str) {
        assert!(values(text).is_empty(), "unexpected phone in {text:?}");
    }

    #[test]
    fn test_candidate_shortened_to_dialable_number() {
        let text = "tel. 601 234 567 12 osób";
        let spans = PhoneDetector::new().unwrap().detect(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].value, "601 234 567");
        assert!(spans[0].is_consistent_with(text));
    }

    #[test_case("+48 601 234 567" ; "plus prefix")]
    #[test_case("0048 601 234 567" ; "double zero prefix")]
    #[test_case("+1 212 555 0100" ; "other country")]
    #[test_case("(123) 456-7890" ; "north american")]
    fn test_accepts_dialable_shapes(number: &str) {
        assert_eq!(values(&format!("Numer {number} teraz")), vec![number.to_string()]);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(PhoneDetector::with_digit_bounds(10, 9).is_err());
        assert!(PhoneDetector::with_digit_bounds(0, 9).is_err());
    }
}
