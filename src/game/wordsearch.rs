use rand::Rng;
use tracing::{info, warn};

use crate::config::WordSearchConfig;
use crate::errors::PuzzleError;
use crate::game::round::{Phase, RoundOutcome, RoundState};
use crate::game::selection::DragState;
use crate::game::validator::MatchValidator;
use crate::models::{Direction, Grid, PlacedWord, Position, Word};
use crate::session::WordTrack;
use crate::utils::letters;

/// The three directions a word-search word may run in.
const DIRECTIONS: [Direction; 3] = [
    Direction::Across,
    Direction::Down,
    Direction::DiagonalDownRight,
];

pub struct WordSearchGenerator;

impl WordSearchGenerator {
    /// Square grid side: longest word plus three, clamped to the configured
    /// bounds.
    pub fn grid_size(words: &[Word], config: &WordSearchConfig) -> usize {
        let longest = words.iter().map(Word::len).max().unwrap_or(0);
        (longest + 3).clamp(config.min_grid, config.max_grid)
    }

    /// Place each word once, longest first, then fill the gaps with random
    /// letters. Placement is a bounded retry loop, not a backtracking search:
    /// every word gets up to `placement_trials` uniform draws of (direction,
    /// start cell), and a word that never fits is skipped silently.
    pub fn generate(
        words: &[Word],
        config: &WordSearchConfig,
        rng: &mut impl Rng,
    ) -> (Grid, Vec<PlacedWord>) {
        let size = Self::grid_size(words, config);
        let mut grid = Grid::new(size, size);
        let mut placed: Vec<PlacedWord> = Vec::new();

        // Stable sort keeps list order among equal lengths.
        let mut ordered: Vec<&Word> = words.iter().collect();
        ordered.sort_by_key(|w| std::cmp::Reverse(w.len()));

        for word in ordered {
            let mut was_placed = false;
            for _ in 0..config.placement_trials {
                let direction = DIRECTIONS[rng.random_range(0..DIRECTIONS.len())];
                let start = Position {
                    row: rng.random_range(0..size),
                    col: rng.random_range(0..size),
                };
                if Self::can_place(&grid, &word.clean, start, direction) {
                    placed.push(Self::place(&mut grid, word, start, direction));
                    was_placed = true;
                    break;
                }
            }
            if !was_placed {
                warn!(
                    word = %word.clean,
                    trials = config.placement_trials,
                    "giving up on unplaceable word"
                );
            }
        }

        // Fillers come from the basic alphabet only, so a filler can never
        // collide with an accented letter in a placed word.
        for row in 0..size {
            for col in 0..size {
                let pos = Position { row, col };
                if grid.letter(pos).is_none() {
                    grid.set_letter(pos, letters::random_filler_letter(rng));
                }
            }
        }

        info!(size, placed = placed.len(), total = words.len(), "word search generated");
        (grid, placed)
    }

    /// A spot works if the whole span stays in bounds and every covered cell
    /// is empty or already holds the identical letter.
    fn can_place(grid: &Grid, clean: &str, start: Position, direction: Direction) -> bool {
        let (row_dir, col_dir) = direction.delta();
        let len = clean.chars().count() as isize;

        let end_row = start.row as isize + (len - 1) * row_dir;
        let end_col = start.col as isize + (len - 1) * col_dir;
        if end_row >= grid.height() as isize || end_col >= grid.width() as isize {
            return false;
        }

        clean.chars().enumerate().all(|(i, ch)| {
            let pos = Position {
                row: (start.row as isize + i as isize * row_dir) as usize,
                col: (start.col as isize + i as isize * col_dir) as usize,
            };
            grid.letter(pos).map_or(true, |existing| existing == ch)
        })
    }

    fn place(grid: &mut Grid, word: &Word, start: Position, direction: Direction) -> PlacedWord {
        let (row_dir, col_dir) = direction.delta();
        let mut cells = Vec::with_capacity(word.len());

        for (i, ch) in word.clean.chars().enumerate() {
            let pos = Position {
                row: (start.row as isize + i as isize * row_dir) as usize,
                col: (start.col as isize + i as isize * col_dir) as usize,
            };
            grid.set_letter(pos, ch);
            cells.push(pos);
        }

        PlacedWord {
            word: word.clone(),
            cells,
            direction,
            number: None,
            completed: false,
        }
    }
}

/// Result of releasing a drag selection.
#[derive(Debug, Clone)]
pub enum SelectionOutcome {
    /// There was no active gesture.
    NoSelection,
    /// The selection spelled a placed word (forward or reversed).
    Match {
        word_index: usize,
        track: WordTrack,
        /// Present when this find won the round.
        outcome: Option<RoundOutcome>,
    },
    /// No word matched; the cells get a transient invalid flash and the
    /// wrong-attempt counter moves. Grid letters are untouched.
    Miss { cells: Vec<Position> },
}

/// One word-search round: generated grid, drag-selection controller, match
/// validation, and the countdown.
pub struct WordSearchRound {
    grid: Grid,
    placed: Vec<PlacedWord>,
    drag: DragState,
    state: RoundState,
}

impl WordSearchRound {
    /// Generate a puzzle from an already-normalized word list. At least one
    /// valid word is required; with none the grid would be pure noise.
    pub fn new(
        words: &[Word],
        config: &WordSearchConfig,
        tracked: bool,
        rng: &mut impl Rng,
    ) -> Result<Self, PuzzleError> {
        if words.is_empty() {
            return Err(PuzzleError::NoPlayableWords);
        }
        let (grid, placed) = WordSearchGenerator::generate(words, config, rng);
        Ok(Self {
            grid,
            placed,
            drag: DragState::Idle,
            state: RoundState::new(config.timer_secs, tracked),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn placed_words(&self) -> &[PlacedWord] {
        &self.placed
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn time_left(&self) -> u32 {
        self.state.time_left()
    }

    pub fn wrong_attempts(&self) -> u32 {
        self.state.wrong_attempts()
    }

    pub fn found_count(&self) -> usize {
        self.placed.iter().filter(|pw| pw.completed).count()
    }

    pub fn selection(&self) -> &[Position] {
        self.drag.path()
    }

    /// Leave the start screen; the timer starts counting.
    pub fn start(&mut self) {
        self.state.start();
    }

    /// Pointer/touch down on a cell anchors a new selection.
    pub fn pointer_down(&mut self, pos: Position) -> Result<(), PuzzleError> {
        if !self.state.is_active() {
            return Err(PuzzleError::RoundNotActive);
        }
        if self.grid.contains(pos) {
            self.drag.begin(pos);
        }
        Ok(())
    }

    /// Pointer/touch move recomputes the straight path from the anchor.
    pub fn pointer_move(&mut self, pos: Position) {
        self.drag.update(pos, self.grid.width(), self.grid.height());
    }

    /// Touch-cancel discards the gesture without validation.
    pub fn cancel_selection(&mut self) {
        self.drag.cancel();
    }

    /// Pointer release finalizes the selection, validates it, and always
    /// clears the drag state. A release after the round ended (a drag held
    /// across the timeout tick) is discarded unvalidated, so a terminal
    /// phase can never produce a second outcome.
    pub fn pointer_up(&mut self) -> SelectionOutcome {
        let Some(path) = self.drag.release() else {
            return SelectionOutcome::NoSelection;
        };
        if !self.state.is_active() {
            return SelectionOutcome::NoSelection;
        }

        let selected = MatchValidator::extract_word(&self.grid, &path);
        match MatchValidator::match_selection(&self.placed, &selected) {
            Some(word_index) => {
                self.placed[word_index].completed = true;
                // Word search counts mistakes globally, so per-word is zero.
                let track = WordTrack {
                    word_id: self.placed[word_index].word.id.clone(),
                    correct: true,
                    wrong_action: 0,
                };
                let outcome = if self.found_count() >= self.placed.len() {
                    Some(self.state.win())
                } else {
                    None
                };
                SelectionOutcome::Match {
                    word_index,
                    track,
                    outcome,
                }
            }
            None => {
                self.state.record_wrong();
                SelectionOutcome::Miss { cells: path }
            }
        }
    }

    /// One-second timer tick; yields the terminal outcome when time runs out.
    pub fn tick(&mut self) -> Option<RoundOutcome> {
        if self.state.tick() {
            Some(self.state.time_out(self.found_count(), self.placed.len()))
        } else {
            None
        }
    }
}
