//! Text cleaning shared by the Heaps and Zipf pipelines.

/// Returns true for characters that are dropped before tokenizing: ASCII
/// punctuation (the double quote is kept), ASCII and Persian digits, and the
/// Arabic-script punctuation, tatweel and short-vowel marks that show up in
/// Persian news text.
pub fn is_removed(c: char) -> bool {
    match c {
        '"' => false,
        c if c.is_ascii_punctuation() || c.is_ascii_digit() => true,
        '\u{06F0}'..='\u{06F9}' => true, // Persian digits
        '\u{064B}'..='\u{0651}' => true, // tanwin, short vowels and shadda
        '\u{061B}' | '\u{061F}' | '\u{066A}' | '\u{0640}' => true,
        '«' | '»' | '÷' | '❊' => true,
        _ => false,
    }
}

/// Strips every character for which [`is_removed`] holds.
pub fn remove_punctuation(text: &str) -> String {
    text.chars().filter(|&c| !is_removed(c)).collect()
}

/// Removes punctuation and digits, then lowercases.
pub fn normalize(text: &str) -> String {
    remove_punctuation(text).to_lowercase()
}

/// Splits cleaned text on whitespace.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
