//! Text analysis for index terms.
//!
//! The analysis pipeline here is deliberately small: terms are case-folded
//! and titles are split on whitespace. No stemming, no stop words; a query
//! matches exactly the normalized form of an indexed token.

/// Normalize a term for indexing or lookup: trim and case-fold.
pub fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Split a title into normalized word tokens.
///
/// Each token is independently indexable, so one record is reachable from
/// every word in its title.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(|word| word.to_lowercase())
}
