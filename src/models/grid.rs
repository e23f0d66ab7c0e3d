use serde::{Deserialize, Serialize};

use super::word::Word;

/// Zero-indexed cell coordinate, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Direction a placed word runs in. The crossword uses only `Across` and
/// `Down`; the diagonal exists for word search placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
    #[serde(rename = "diagonal")]
    DiagonalDownRight,
}

impl Direction {
    /// Unit (row, col) step along the word.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
        }
    }

    /// Crossing direction for crossword placement. Diagonal words never
    /// cross, so the diagonal maps to itself.
    pub fn perpendicular(self) -> Direction {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
            Direction::DiagonalDownRight => Direction::DiagonalDownRight,
        }
    }
}

/// One grid cell. `letter` is the solution letter (empty cells in a crossword
/// are blocks), `number` a crossword clue number shown on the first cell of a
/// word, and `user_input` whatever the player has typed there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    pub letter: Option<char>,
    pub number: Option<usize>,
    pub user_input: Option<char>,
}

/// Fixed-size 2D cell store backing one puzzle, laid out as a flat arena
/// indexed by coordinate. Words reference cells by `Position`, so a crossword
/// intersection is a single cell shared by both owners and can never hold two
/// different letters. Created once per round and never resized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![Cell::default(); width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.width + pos.col
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if self.contains(pos) {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if self.contains(pos) {
            let idx = self.index(pos);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub fn letter(&self, pos: Position) -> Option<char> {
        self.get(pos).and_then(|cell| cell.letter)
    }

    pub fn user_input(&self, pos: Position) -> Option<char> {
        self.get(pos).and_then(|cell| cell.user_input)
    }

    pub fn set_letter(&mut self, pos: Position, letter: char) {
        if let Some(cell) = self.get_mut(pos) {
            cell.letter = Some(letter);
        }
    }

    pub fn set_user_input(&mut self, pos: Position, input: Option<char>) {
        if let Some(cell) = self.get_mut(pos) {
            cell.user_input = input;
        }
    }
}

/// A word written into the grid, with its cell coordinates matching the
/// clean text index-for-index. The grid owns the cells; this only points
/// at them.
#[derive(Debug, Clone)]
pub struct PlacedWord {
    pub word: Word,
    pub cells: Vec<Position>,
    pub direction: Direction,
    /// Crossword clue number; `None` in word search.
    pub number: Option<usize>,
    pub completed: bool,
}

impl PlacedWord {
    pub fn covers(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Index of a position within this word's cells, if covered.
    pub fn cell_index(&self, pos: Position) -> Option<usize> {
        self.cells.iter().position(|&c| c == pos)
    }
}
