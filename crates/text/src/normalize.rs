//! Canonical form for user input.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize user text for matching: trim, fold diacritics, lowercase.
///
/// Folding goes through NFD so accented letters lose their combining
/// marks ("não" -> "nao", "ESTUFA Elétrica" -> "estufa eletrica").
/// Digits, `#` and punctuation pass through untouched. Idempotent and
/// total; never fails.
pub fn normalize(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// First whitespace-delimited token of the raw text, if any.
///
/// Name capture takes this from the unnormalized message so the stored
/// name keeps its original letters.
pub fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Uppercase the first character, lowercase the rest.
///
/// "maria" -> "Maria", "JOÃO" -> "João". Unicode-aware; expansion under
/// case mapping is kept (ß and friends).
pub fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
