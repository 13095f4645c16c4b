//! Predefined character sets for single-character search ranges.

/// The nine lowercase Polish diacritic letters.
const POLISH_LOWERCASE: [&str; 9] = ["ą", "ć", "ę", "ł", "ń", "ó", "ś", "ż", "ź"];

/// A predefined character set, expanded to one item per character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// Every printable, non-whitespace, non-control character with code
    /// point 0-127 (94 items).
    Ascii,

    /// `a` through `z`.
    EnglishLetters,

    /// `a` through `z` plus the lowercase Polish diacritics.
    EnglishPlusPolish,

    /// [`Charset::Ascii`] plus the Polish diacritics in both cases.
    AsciiPlusPolish,
}

/// Expands a charset into its ordered item list.
pub(super) fn expand(set: Charset) -> Vec<String> {
    match set {
        Charset::Ascii => printable_ascii().collect(),
        Charset::EnglishLetters => english_letters().collect(),
        Charset::EnglishPlusPolish => english_letters()
            .chain(POLISH_LOWERCASE.iter().map(|s| s.to_string()))
            .collect(),
        Charset::AsciiPlusPolish => printable_ascii()
            .chain(POLISH_LOWERCASE.iter().map(|s| s.to_string()))
            .chain(POLISH_LOWERCASE.iter().map(|s| s.to_uppercase()))
            .collect(),
    }
}

fn printable_ascii() -> impl Iterator<Item = String> {
    (0u8..=127)
        .map(char::from)
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .map(String::from)
}

fn english_letters() -> impl Iterator<Item = String> {
    ('a'..='z').map(String::from)
}
