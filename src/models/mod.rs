pub mod grid;
pub mod word;

pub use grid::{Cell, Direction, Grid, PlacedWord, Position};
pub use word::{normalize_words, ClueType, PuzzleMode, RawWord, Word};
