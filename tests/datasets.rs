// Dataset invariants for the quote list.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

#[test]
fn quotes_are_unique_and_non_empty() {
    let mut seen = HashSet::new();
    for q in shinchan_stage::QUOTES {
        assert!(!q.trim().is_empty(), "blank quote in QUOTES");
        assert!(seen.insert(*q), "duplicate quote '{}' in QUOTES", q);
    }
}

#[test]
fn enough_quotes_to_rotate() {
    // next_quote never repeats the current one, which needs at least two.
    assert!(shinchan_stage::QUOTES.len() >= 2);
}

#[test]
fn quotes_have_no_stray_markup() {
    for q in shinchan_stage::QUOTES {
        assert!(!q.contains('<') && !q.contains('>'), "quote '{}' looks like markup", q);
    }
}
