//! Overlap resolution for candidate spans
//!
//! Greedy interval scheduling over the pooled output of all detectors.
//! Candidates are ordered by start offset, then by length (longest first),
//! then by category priority and value. The last two keys only break exact
//! ties, which makes the result independent of detector order. A single
//! left-to-right pass then accepts a span iff it starts at or after the end
//! of the previously accepted one.

use crate::anonymization::models::DetectedSpan;
use std::cmp::Reverse;

/// Select a maximal non-overlapping, left-to-right set of spans
///
/// Spans that do not describe a real slice of `text` are dropped before
/// scheduling.
pub fn resolve_overlaps(text: &str, candidates: Vec<DetectedSpan>) -> Vec<DetectedSpan> {
    let mut candidates: Vec<DetectedSpan> = candidates
        .into_iter()
        .filter(|span| {
            let consistent = span.is_consistent_with(text);
            if !consistent {
                tracing::warn!(
                    category = %span.category,
                    start = span.start,
                    end = span.end,
                    "Dropping malformed detector span"
                );
            }
            consistent
        })
        .collect();

    candidates.sort_by(|a, b| {
        (a.start, Reverse(a.len()), a.category.priority(), &a.value).cmp(&(
            b.start,
            Reverse(b.len()),
            b.category.priority(),
            &b.value,
        ))
    });

    let mut accepted = Vec::with_capacity(candidates.len());
    let mut last_end = 0;

    for span in candidates {
        if span.start >= last_end {
            last_end = span.end;
            accepted.push(span);
        }
    }

    accepted
}
