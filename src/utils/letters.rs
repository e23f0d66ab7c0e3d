use once_cell::sync::Lazy;
use rand::Rng;
use std::collections::HashMap;

/// Accented Latin letters allowed on the grid in addition to A-Z.
pub const ACCENTED_LETTERS: &str = "ÀÂÄÉÈÊËÏÎÔÙÛÜÇ";

/// Alphabet used to fill leftover word-search cells. Accented letters are
/// deliberately excluded so a filler can never collide with one.
pub const FILLER_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Speech locale per supported language code; playback itself is external.
static SPEECH_LOCALES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("en", "en-US");
    map.insert("fr", "fr-FR");
    map.insert("es", "es-ES");
    map
});

/// Check whether a character may appear on the grid.
pub fn is_puzzle_letter(ch: char) -> bool {
    ch.is_ascii_uppercase() || ACCENTED_LETTERS.contains(ch)
}

/// Draw a uniformly random letter from the basic 26-letter alphabet.
pub fn random_filler_letter(rng: &mut impl Rng) -> char {
    FILLER_ALPHABET[rng.random_range(0..FILLER_ALPHABET.len())] as char
}

/// Resolve the BCP-47 speech locale for a language code.
pub fn speech_locale(lang: &str) -> &'static str {
    SPEECH_LOCALES.get(lang).copied().unwrap_or("en-US")
}
