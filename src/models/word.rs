use serde::{Deserialize, Serialize};

use crate::utils::letters;

/// Which puzzle a word list is being prepared for. The two modes normalize
/// and bound words differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleMode {
    WordSearch,
    Crossword,
}

/// A vocabulary entry as delivered by the session collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWord {
    pub id: String,
    pub word: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default, rename = "textClue")]
    pub text_clue: Option<String>,
    #[serde(default, rename = "clueType")]
    pub clue_type: Option<ClueType>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClueType {
    Text,
    Image,
    Audio,
}

/// A normalized vocabulary word, immutable once a round starts.
#[derive(Debug, Clone)]
pub struct Word {
    pub id: String,
    /// Display text as authored, shown in word lists and spoken aloud.
    pub display: String,
    /// Uppercase letters-only token actually used on the grid.
    pub clean: String,
    pub image: Option<String>,
    pub audio: Option<String>,
    pub text_clue: Option<String>,
    pub clue_type: ClueType,
}

impl Word {
    pub fn len(&self) -> usize {
        self.clean.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.clean.is_empty()
    }

    fn from_raw(raw: &RawWord, mode: PuzzleMode) -> Option<Word> {
        let clean = clean_text(&raw.word, mode);
        let len = clean.chars().count();
        let within_bounds = match mode {
            PuzzleMode::WordSearch => (2..=12).contains(&len),
            PuzzleMode::Crossword => len >= 2,
        };
        if !within_bounds {
            return None;
        }

        let clue_type = raw.clue_type.unwrap_or(if raw.text_clue.is_some() {
            ClueType::Text
        } else if raw.image.is_some() {
            ClueType::Image
        } else {
            ClueType::Audio
        });

        Some(Word {
            id: raw.id.clone(),
            display: raw.word.clone(),
            clean,
            image: raw.image.clone(),
            audio: raw.audio.clone(),
            text_clue: raw.text_clue.clone(),
            clue_type,
        })
    }
}

/// Reduce raw text to the uppercase letters-only token used on the grid.
///
/// Word search keeps only the part before the first whitespace/underscore run
/// (one grid word per entry); the crossword uses the full text.
fn clean_text(raw: &str, mode: PuzzleMode) -> String {
    let source = match mode {
        PuzzleMode::WordSearch => raw
            .split(|c: char| c.is_whitespace() || c == '_')
            .next()
            .filter(|token| !token.is_empty())
            .unwrap_or(raw),
        PuzzleMode::Crossword => raw,
    };

    source
        .chars()
        .flat_map(char::to_uppercase)
        .filter(|&c| letters::is_puzzle_letter(c))
        .collect()
}

/// Filter, cap, and normalize a raw word list for the given mode.
///
/// Disabled entries and words failing the mode's length bounds are dropped
/// silently; the caller decides what an empty result means.
pub fn normalize_words(raw: &[RawWord], mode: PuzzleMode, max_words: usize) -> Vec<Word> {
    raw.iter()
        .filter(|w| w.enabled && w.word.chars().count() >= 2)
        .take(max_words)
        .filter_map(|w| Word::from_raw(w, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, text: &str) -> RawWord {
        RawWord {
            id: id.to_string(),
            word: text.to_string(),
            image: None,
            audio: None,
            text_clue: None,
            clue_type: None,
            enabled: true,
        }
    }

    #[test]
    fn test_word_search_takes_first_token() {
        let words = normalize_words(&[raw("1", "ice cream")], PuzzleMode::WordSearch, 8);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].clean, "ICE");
    }

    #[test]
    fn test_crossword_keeps_full_text() {
        let words = normalize_words(&[raw("1", "ice cream")], PuzzleMode::Crossword, 20);
        assert_eq!(words[0].clean, "ICECREAM");
    }

    #[test]
    fn test_accented_letters_survive() {
        let words = normalize_words(&[raw("1", "éléphant")], PuzzleMode::Crossword, 20);
        assert_eq!(words[0].clean, "ÉLÉPHANT");
    }

    #[test]
    fn test_non_letters_are_stripped() {
        let words = normalize_words(&[raw("1", "it's-a2b")], PuzzleMode::Crossword, 20);
        assert_eq!(words[0].clean, "ITSAB");
    }

    #[test]
    fn test_length_bounds() {
        // Too short after cleaning, and too long for word search.
        let entries = [raw("1", "a1"), raw("2", "extraordinarily")];
        assert!(normalize_words(&entries, PuzzleMode::WordSearch, 8).is_empty());
        // The crossword has no upper bound.
        let words = normalize_words(&entries, PuzzleMode::Crossword, 20);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].clean, "EXTRAORDINARILY");
    }

    #[test]
    fn test_disabled_words_are_dropped() {
        let mut entry = raw("1", "cat");
        entry.enabled = false;
        assert!(normalize_words(&[entry], PuzzleMode::WordSearch, 8).is_empty());
    }

    #[test]
    fn test_cap_applies_before_cleaning() {
        let entries: Vec<RawWord> = (0..10).map(|i| raw(&i.to_string(), "word")).collect();
        assert_eq!(normalize_words(&entries, PuzzleMode::WordSearch, 8).len(), 8);
    }

    #[test]
    fn test_clue_type_fallback_order() {
        let mut with_text = raw("1", "cat");
        with_text.text_clue = Some("feline".to_string());
        let mut with_image = raw("2", "dog");
        with_image.image = Some("dog.png".to_string());
        let plain = raw("3", "bird");

        let words = normalize_words(&[with_text, with_image, plain], PuzzleMode::WordSearch, 8);
        assert_eq!(words[0].clue_type, ClueType::Text);
        assert_eq!(words[1].clue_type, ClueType::Image);
        assert_eq!(words[2].clue_type, ClueType::Audio);
    }
}
