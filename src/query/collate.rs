//! Locale-aware string collation for sorting.
//!
//! Approximates the root collation: accents are ignored at the primary
//! level, case is folded, and separators sort before digits, digits before
//! letters. Strings equal at the primary level are ordered by their raw
//! form, which keeps the order total.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Precomputed sort key. Comparing keys is equivalent to [`compare`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<(u8, char)>,
    tertiary: String,
}

/// Build the collation key for `text`.
#[must_use]
pub fn collation_key(text: &str) -> CollationKey {
    let primary = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (weight(c), c))
        .collect();
    CollationKey {
        primary,
        tertiary: text.to_string(),
    }
}

/// Compare two strings by collation order.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn weight(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}
