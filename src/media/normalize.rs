use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

/// Lowercase, NFD, drop combining diacritical marks.
pub fn normalize_search_text(value: &str) -> String {
    strip_accents(&value.to_lowercase())
}

fn strip_accents(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Alphabetical comparison that ignores case and accents first, then uses
/// them to break ties so the order stays total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    normalize_search_text(a)
        .cmp(&normalize_search_text(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}
