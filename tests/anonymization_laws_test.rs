//! Integration tests for the anonymize/restore laws of the engine

use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use pii_gateway::anonymization::detector::{
    EntityLexiconDetector, NationalIdDetector, PhoneDetector, PiiDetector, RegexDetector,
};
use pii_gateway::anonymization::resolver::resolve_overlaps;
use pii_gateway::anonymization::tokenization::{is_token, token_pattern};
use pii_gateway::anonymization::{
    AnonymizationEngine, DetectedSpan, DetectionConfig, DetectionMethod, PiiCategory,
};
use proptest::prelude::*;
use std::sync::Arc;

fn default_engine() -> AnonymizationEngine {
    AnonymizationEngine::from_config(&DetectionConfig::default()).unwrap()
}

/// Detector that reports a fixed set of candidates
struct StaticDetector(Vec<DetectedSpan>);

impl PiiDetector for StaticDetector {
    fn name(&self) -> &'static str {
        "static"
    }

    fn detect(&self, _text: &str) -> Vec<DetectedSpan> {
        self.0.clone()
    }
}

#[test]
fn test_no_match_passthrough() {
    let engine = default_engine();
    let result = engine.anonymize("Hello world!");
    assert_eq!(result.text, "Hello world!");
    assert!(result.mapping.is_empty());
}

#[test]
fn test_empty_input() {
    let engine = default_engine();
    let result = engine.anonymize("");
    assert_eq!(result.text, "");
    assert!(result.mapping.is_empty());
}

#[test]
fn test_multi_category_round_trip() {
    let engine = default_engine();
    let text = "Call 123-456-7890 or email foo@bar.com";
    let result = engine.anonymize(text);

    assert_eq!(result.mapping.len(), 2);
    let counts = result.mapping.counts_by_category();
    assert_eq!(counts.get(&PiiCategory::Phone), Some(&1));
    assert_eq!(counts.get(&PiiCategory::Email), Some(&1));
    assert!(!result.text.contains("123-456-7890"));
    assert!(!result.text.contains("foo@bar.com"));
    assert!(result.text.starts_with("Call <PII:PHONE:"));

    assert_eq!(engine.restore(&result.text, &result.mapping), text);
}

#[test]
fn test_consistency_law() {
    let engine = default_engine();
    let text = "Write to ola@example.pl. Copy ola@example.pl and ola@example.pl.";
    let result = engine.anonymize(text);

    assert_eq!(result.mapping.len(), 1);
    let tokens: Vec<&str> = token_pattern()
        .find_iter(&result.text)
        .map(|m| m.as_str())
        .collect();
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| *t == tokens[0]));
    assert_eq!(engine.restore(&result.text, &result.mapping), text);
}

#[test]
fn test_overlap_tie_break() {
    let text = "apple banana";
    let span = |start: usize, end: usize| {
        DetectedSpan::new(
            PiiCategory::Organization,
            &text[start..end],
            start,
            end,
            DetectionMethod::Lexicon,
        )
    };

    let accepted = resolve_overlaps(text, vec![span(6, 12), span(0, 5), span(0, 12)]);
    assert_eq!(accepted.len(), 1);
    assert_eq!((accepted[0].start, accepted[0].end), (0, 12));

    let engine = AnonymizationEngine::new(vec![Arc::new(StaticDetector(vec![
        span(0, 5),
        span(6, 12),
        span(0, 12),
    ]))]);
    let result = engine.anonymize(text);
    assert_eq!(result.mapping.len(), 1);
    assert!(is_token(&result.text));
}

#[test]
fn test_detector_order_does_not_change_result() {
    let text = "PESEL 44051401359, tel. 601 234 567";
    let forward = AnonymizationEngine::new(vec![
        Arc::new(PhoneDetector::new().unwrap()),
        Arc::new(NationalIdDetector::new().unwrap()),
    ]);
    let backward = AnonymizationEngine::new(vec![
        Arc::new(NationalIdDetector::new().unwrap()),
        Arc::new(PhoneDetector::new().unwrap()),
    ]);

    let categories = |engine: &AnonymizationEngine| {
        engine
            .detect(text)
            .into_iter()
            .map(|s| (s.start, s.end, s.category))
            .collect::<Vec<_>>()
    };
    let spans = |engine: &AnonymizationEngine| {
        resolve_overlaps(text, engine.detect(text))
            .into_iter()
            .map(|s| (s.start, s.end, s.category))
            .collect::<Vec<_>>()
    };

    assert_eq!(spans(&forward), spans(&backward));
    assert!(categories(&forward).len() >= 2);
    assert!(spans(&forward)
        .iter()
        .any(|(_, _, c)| *c == PiiCategory::NationalId));
}

#[test]
fn test_pesel_checksum() {
    let detector = NationalIdDetector::new().unwrap();

    let valid = detector.detect("PESEL: 44051401359");
    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0].value, "44051401359");

    assert!(detector.detect("PESEL: 44051401358").is_empty());

    let two = detector.detect("44051401359 i 92082612343");
    assert_eq!(two.len(), 2);
    assert!(two[0].start < two[1].start);
    assert_eq!(two[1].value, "92082612343");
}

#[test]
fn test_default_engine_keeps_pesel_and_date_categories() {
    let engine = default_engine();

    let result = engine.anonymize("PESEL 44051401359 12 lat");
    assert_eq!(result.mapping.len(), 1);
    assert_eq!(
        result.mapping.counts_by_category().get(&PiiCategory::NationalId),
        Some(&1)
    );
    assert!(result.text.starts_with("PESEL <PII:NATIONAL_ID:"));
    assert!(result.text.ends_with("> 12 lat"));

    let result = engine.anonymize("Spotkanie 2024-03-15 10:30");
    assert_eq!(result.mapping.len(), 1);
    assert_eq!(
        result.mapping.counts_by_category().get(&PiiCategory::Date),
        Some(&1)
    );
    assert!(result.text.starts_with("Spotkanie <PII:DATE:"));
    assert!(result.text.ends_with("> 10:30"));

    let result = engine.anonymize("44051401358 i 601 234 567");
    let counts = result.mapping.counts_by_category();
    assert_eq!(counts.get(&PiiCategory::NationalId), None);
    assert_eq!(counts.get(&PiiCategory::Phone), Some(&1));
    assert!(result.text.starts_with("44051401358 i <PII:PHONE:"));
}

#[test]
fn test_lexicon_entities_with_default_detectors() {
    let lexicon = EntityLexiconDetector::from_toml(
        r#"
[entities]
persName = ["Jan Kowalski", "Jan"]
placeName = ["Warszawa"]
"#,
    )
    .unwrap();

    let mut detectors: Vec<Arc<dyn PiiDetector>> = vec![Arc::new(RegexDetector::new().unwrap())];
    detectors.push(Arc::new(lexicon));
    let engine = AnonymizationEngine::new(detectors);

    let text = "Jan Kowalski z Warszawa, jan.kowalski@example.com";
    let result = engine.anonymize(text);

    let counts = result.mapping.counts_by_category();
    assert_eq!(counts.get(&PiiCategory::Person), Some(&1));
    assert_eq!(counts.get(&PiiCategory::Location), Some(&1));
    assert_eq!(counts.get(&PiiCategory::Email), Some(&1));
    assert_eq!(engine.restore(&result.text, &result.mapping), text);
}

#[test]
fn test_restore_survives_reordered_tokens() {
    let engine = default_engine();
    let result = engine.anonymize("from a@b.com to c@d.com");

    let tokens: Vec<String> = token_pattern()
        .find_iter(&result.text)
        .map(|m| m.as_str().to_string())
        .collect();
    let reply = format!("{} wrote to {} and {} again", tokens[1], tokens[0], tokens[1]);

    assert_eq!(
        engine.restore(&reply, &result.mapping),
        "c@d.com wrote to a@b.com and c@d.com again"
    );
}

#[test]
fn test_fake_emails_are_replaced() {
    let engine = default_engine();
    for _ in 0..20 {
        let email: String = SafeEmail().fake();
        let text = format!("Contact: {email}.");
        let result = engine.anonymize(&text);

        assert!(!result.text.contains(&email), "{email} leaked");
        assert_eq!(engine.restore(&result.text, &result.mapping), text);
    }
}

proptest! {
    #[test]
    fn prop_round_trip(
        prefix in "[a-zA-Z ,.]{0,24}",
        user in "[a-z]{1,8}",
        domain in "[a-z]{2,8}",
        digits in proptest::collection::vec(0u8..10, 9..=9),
        suffix in "[a-zA-Z ,.]{0,24}",
    ) {
        let phone: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        let text = format!("{prefix} {user}@{domain}.com {phone} {suffix}");

        let engine = default_engine();
        let result = engine.anonymize(&text);
        prop_assert_eq!(engine.restore(&result.text, &result.mapping), text);
    }

    #[test]
    fn prop_plain_text_passthrough(text in "[a-zA-Z ,.!?]{0,64}") {
        let engine = default_engine();
        let result = engine.anonymize(&text);
        prop_assert_eq!(&result.text, &text);
        prop_assert!(result.mapping.is_empty());
    }
}
