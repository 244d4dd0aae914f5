//! Tokenization shared by documents and queries.
//!
//! Policy: NFKC-normalize, lower-case, then take maximal runs of Unicode
//! letters, combining marks and digits. Every other character is a boundary.
//! There is no stop-word removal and no stemming, so "Speaker" matches
//! "speaker" but not "speakers".

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{M}\p{N}]+").expect("valid regex");
}

/// Tokenize text into lower-cased terms, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    // lower-casing "İ" yields "i" plus U+0307; fold it so "İstanbul" matches "istanbul"
    let normalized = text.nfkc().collect::<String>().to_lowercase().replace("i\u{307}", "i");
    RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}
