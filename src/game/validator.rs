use crate::models::{Grid, PlacedWord, Position};

pub struct MatchValidator;

impl MatchValidator {
    /// Read the letters under a selection path, in path order.
    pub fn extract_word(grid: &Grid, path: &[Position]) -> String {
        path.iter().filter_map(|&pos| grid.letter(pos)).collect()
    }

    /// Compare a finalized selection against every not-yet-found placed word,
    /// forward and reversed (a word may be dragged from either end). Returns
    /// the index of the first match.
    pub fn match_selection(placed: &[PlacedWord], selected: &str) -> Option<usize> {
        let reversed: String = selected.chars().rev().collect();
        placed.iter().position(|pw| {
            !pw.completed && (pw.word.clean == selected || pw.word.clean == reversed)
        })
    }

    /// Is the typed letter at this cell the solution letter?
    pub fn cell_correct(grid: &Grid, pos: Position) -> bool {
        match grid.get(pos) {
            Some(cell) => cell.letter.is_some() && cell.user_input == cell.letter,
            None => false,
        }
    }

    /// A crossword word is complete when every owned cell is typed correctly.
    pub fn word_complete(grid: &Grid, word: &PlacedWord) -> bool {
        word.cells.iter().all(|&pos| Self::cell_correct(grid, pos))
    }
}
