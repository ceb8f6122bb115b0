use std::sync::LazyLock;

use regex::Regex;

/// Model-number shape used on listing cards: letter prefix, optional hyphen,
/// digits, optional trailing letters/digits and an optional `-N` suffix.
static LISTING_MODEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]{1,4}-?[0-9]{2,5}[A-Za-z]{0,3}[0-9]{0,4}[A-Za-z]?(?:-[0-9]+)?")
        .expect("listing model pattern")
});

/// Narrower shape used when guessing a model number from a product title.
static TITLE_MODEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]{1,4}-?[0-9]{2,5}[A-Za-z]?[0-9]{0,4}[A-Za-z]?")
        .expect("title model pattern")
});

const FALLBACK_TOKENS: usize = 3;

/// Derive a search keyword from a free-text listing title.
///
/// Returns the leftmost model-number-shaped substring when there is one,
/// otherwise the first three whitespace-separated tokens. Blank input yields
/// an empty string.
pub fn extract_keyword(title: &str) -> String {
    match LISTING_MODEL.find(title) {
        Some(found) => found.as_str().to_string(),
        None => fallback_keyword(title),
    }
}

/// First three whitespace-separated tokens of `title`, joined by single spaces.
pub fn fallback_keyword(title: &str) -> String {
    title
        .split_whitespace()
        .take(FALLBACK_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn model_number_from_title(title: &str) -> Option<String> {
    TITLE_MODEL.find(title).map(|m| m.as_str().to_string())
}
