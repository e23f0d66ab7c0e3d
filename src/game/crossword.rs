use tracing::{info, warn};

use crate::config::CrosswordConfig;
use crate::errors::PuzzleError;
use crate::game::round::{Phase, RoundOutcome, RoundState};
use crate::game::validator::MatchValidator;
use crate::models::{Direction, Grid, PlacedWord, Position, Word};
use crate::session::WordTrack;

/// Oversized temporary grid used only during placement, before the final
/// bounding-box trim.
struct ScratchGrid {
    cells: Vec<Option<char>>,
    size: usize,
}

impl ScratchGrid {
    fn new(size: usize) -> Self {
        Self {
            cells: vec![None; size * size],
            size,
        }
    }

    fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && row < self.size as isize && col < self.size as isize
    }

    /// Letter at (row, col); `None` for empty or out-of-bounds cells.
    fn get(&self, row: isize, col: isize) -> Option<char> {
        if self.in_bounds(row, col) {
            self.cells[row as usize * self.size + col as usize]
        } else {
            None
        }
    }

    fn set(&mut self, row: usize, col: usize, ch: char) {
        self.cells[row * self.size + col] = Some(ch);
    }
}

pub struct CrosswordGenerator;

impl CrosswordGenerator {
    /// Build a crossword from an already-normalized word list.
    ///
    /// Words are processed longest first. The first word goes horizontally
    /// across the scratch grid's center; every later word takes the first
    /// letter intersection that validates, or falls back to a horizontal
    /// placement two rows below the last placed word. The fallback is not
    /// required to intersect anything, so a puzzle may contain a disconnected
    /// island; a word whose fallback also fails is dropped. Clue numbers are
    /// assigned in placement order, not reading order.
    pub fn generate(
        words: &[Word],
        config: &CrosswordConfig,
    ) -> Result<(Grid, Vec<PlacedWord>), PuzzleError> {
        let size = config.scratch_size;
        let center = size / 2;
        let mut scratch = ScratchGrid::new(size);
        let mut placed: Vec<PlacedWord> = Vec::new();

        // Stable sort keeps list order among equal lengths.
        let mut ordered: Vec<&Word> = words.iter().collect();
        ordered.sort_by_key(|w| std::cmp::Reverse(w.len()));

        for (i, word) in ordered.into_iter().enumerate() {
            let chars: Vec<char> = word.clean.chars().collect();
            let number = i + 1;

            let spot = if i == 0 {
                if chars.len() <= size {
                    let start_col = (center - chars.len() / 2) as isize;
                    Some((center as isize, start_col, Direction::Across))
                } else {
                    None
                }
            } else {
                Self::find_intersection(&scratch, &placed, &chars).or_else(|| {
                    Self::fallback_spot(&scratch, &placed, &chars, center)
                })
            };

            match spot {
                Some((row, col, direction)) => {
                    Self::place_in_scratch(
                        &mut scratch,
                        &mut placed,
                        word,
                        row,
                        col,
                        direction,
                        number,
                    );
                }
                None => warn!(word = %word.clean, "no valid crossword placement, dropping word"),
            }
        }

        if placed.is_empty() {
            return Err(PuzzleError::GenerationFailed);
        }

        let (grid, placed) = Self::trim_to_bounds(&placed, size);
        info!(
            width = grid.width(),
            height = grid.height(),
            placed = placed.len(),
            total = words.len(),
            "crossword generated"
        );
        Ok((grid, placed))
    }

    /// Scan placed words in placement order, then their letters, then the
    /// candidate's letters, for the first equal pair whose perpendicular
    /// placement validates.
    fn find_intersection(
        scratch: &ScratchGrid,
        placed: &[PlacedWord],
        chars: &[char],
    ) -> Option<(isize, isize, Direction)> {
        for pw in placed {
            let direction = pw.direction.perpendicular();
            let (row_dir, col_dir) = direction.delta();
            for (pi, pc) in pw.word.clean.chars().enumerate() {
                for (wi, &wc) in chars.iter().enumerate() {
                    if pc != wc {
                        continue;
                    }
                    // Start so the matching letter lands on the intersection.
                    let anchor = pw.cells[pi];
                    let start_row = anchor.row as isize - wi as isize * row_dir;
                    let start_col = anchor.col as isize - wi as isize * col_dir;
                    if Self::can_place_in_scratch(scratch, chars, start_row, start_col, direction) {
                        return Some((start_row, start_col, direction));
                    }
                }
            }
        }
        None
    }

    /// Horizontal spot two rows below the last placed word's final cell,
    /// centered. May produce an island disconnected from the rest.
    fn fallback_spot(
        scratch: &ScratchGrid,
        placed: &[PlacedWord],
        chars: &[char],
        center: usize,
    ) -> Option<(isize, isize, Direction)> {
        let last_cell = *placed.last()?.cells.last()?;
        let row = last_cell.row as isize + 2;
        let col = center as isize - (chars.len() / 2) as isize;
        if row < scratch.size as isize
            && Self::can_place_in_scratch(scratch, chars, row, col, Direction::Across)
        {
            Some((row, col, Direction::Across))
        } else {
            None
        }
    }

    /// Placement validity on the scratch grid. A spot is rejected when any
    /// cell falls outside the scratch grid, an occupied cell holds a
    /// different letter, a non-crossing cell has an occupied perpendicular
    /// neighbor (two words running side by side would spell extra letters),
    /// or the cell just before the start or after the end is occupied (which
    /// would concatenate words).
    fn can_place_in_scratch(
        scratch: &ScratchGrid,
        chars: &[char],
        start_row: isize,
        start_col: isize,
        direction: Direction,
    ) -> bool {
        let (row_dir, col_dir) = direction.delta();

        for (i, &ch) in chars.iter().enumerate() {
            let row = start_row + i as isize * row_dir;
            let col = start_col + i as isize * col_dir;

            if !scratch.in_bounds(row, col) {
                return false;
            }

            let crossing = match scratch.get(row, col) {
                Some(existing) => {
                    if existing != ch {
                        return false;
                    }
                    true
                }
                None => false,
            };

            // Perpendicular neighbors may be occupied only at a crossing,
            // where they belong to the word being crossed.
            if !crossing {
                let neighbors = if row_dir != 0 {
                    [(row, col - 1), (row, col + 1)]
                } else {
                    [(row - 1, col), (row + 1, col)]
                };
                if neighbors.iter().any(|&(r, c)| scratch.get(r, c).is_some()) {
                    return false;
                }
            }
        }

        let before = scratch.get(start_row - row_dir, start_col - col_dir);
        let after = scratch.get(
            start_row + chars.len() as isize * row_dir,
            start_col + chars.len() as isize * col_dir,
        );
        before.is_none() && after.is_none()
    }

    fn place_in_scratch(
        scratch: &mut ScratchGrid,
        placed: &mut Vec<PlacedWord>,
        word: &Word,
        start_row: isize,
        start_col: isize,
        direction: Direction,
        number: usize,
    ) {
        let (row_dir, col_dir) = direction.delta();
        let mut cells = Vec::with_capacity(word.len());

        for (i, ch) in word.clean.chars().enumerate() {
            let row = (start_row + i as isize * row_dir) as usize;
            let col = (start_col + i as isize * col_dir) as usize;
            scratch.set(row, col, ch);
            cells.push(Position { row, col });
        }

        placed.push(PlacedWord {
            word: word.clone(),
            cells,
            direction,
            number: Some(number),
            completed: false,
        });
    }

    /// Compute the bounding box of every placed cell, expand it by one cell
    /// of padding clamped to the scratch bounds, and remap all placements
    /// into a grid of exactly that size. The remap is a pure translation.
    fn trim_to_bounds(placed: &[PlacedWord], scratch_size: usize) -> (Grid, Vec<PlacedWord>) {
        let mut min_row = scratch_size - 1;
        let mut max_row = 0;
        let mut min_col = scratch_size - 1;
        let mut max_col = 0;
        for pw in placed {
            for cell in &pw.cells {
                min_row = min_row.min(cell.row);
                max_row = max_row.max(cell.row);
                min_col = min_col.min(cell.col);
                max_col = max_col.max(cell.col);
            }
        }

        min_row = min_row.saturating_sub(1);
        min_col = min_col.saturating_sub(1);
        max_row = (max_row + 1).min(scratch_size - 1);
        max_col = (max_col + 1).min(scratch_size - 1);

        let width = max_col - min_col + 1;
        let height = max_row - min_row + 1;
        let mut grid = Grid::new(width, height);

        let mut remapped = placed.to_vec();
        for pw in &mut remapped {
            for cell in &mut pw.cells {
                cell.row -= min_row;
                cell.col -= min_col;
            }
        }

        for pw in &remapped {
            for (pos, ch) in pw.cells.iter().zip(pw.word.clean.chars()) {
                grid.set_letter(*pos, ch);
            }
            if let Some(first) = pw.cells.first() {
                if let Some(cell) = grid.get_mut(*first) {
                    cell.number = pw.number;
                }
            }
        }

        (grid, remapped)
    }
}

/// Keyboard or virtual-keyboard input for the crossword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Letter(char),
    Backspace,
}

/// Result of typing into the focused cell.
#[derive(Debug, Clone)]
pub struct KeyOutcome {
    pub cell: Position,
    /// `None` for backspace, otherwise whether the typed letter was right.
    pub correct: Option<bool>,
    pub completed: Option<CompletedWord>,
    /// Present when this keystroke won the round.
    pub outcome: Option<RoundOutcome>,
}

/// A word whose every cell just became correct. Fires once per word; the
/// shell plays the word's audio and sends `track` to the collaborator.
#[derive(Debug, Clone)]
pub struct CompletedWord {
    pub word_index: usize,
    pub track: WordTrack,
    /// The next incomplete word, already selected for the player.
    pub next_word: Option<usize>,
}

/// Result of force-filling the active word from an autocomplete suggestion.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// Cells graded wrong by the fill; each one also bumped the counters
    /// even though nothing was typed.
    pub wrong_cells: u32,
    pub completed: Option<CompletedWord>,
    pub outcome: Option<RoundOutcome>,
}

/// One crossword round: generated grid, word/cell selection, typing and
/// grading, autocomplete suggestions, and the countdown.
pub struct CrosswordRound {
    grid: Grid,
    placed: Vec<PlacedWord>,
    /// Full normalized word list, kept for autocomplete.
    words: Vec<Word>,
    selected: Option<usize>,
    focused: Option<Position>,
    state: RoundState,
    max_suggestions: usize,
}

impl CrosswordRound {
    pub fn new(
        words: Vec<Word>,
        config: &CrosswordConfig,
        tracked: bool,
    ) -> Result<Self, PuzzleError> {
        if words.is_empty() {
            return Err(PuzzleError::NoPlayableWords);
        }
        let (grid, placed) = CrosswordGenerator::generate(&words, config)?;
        Ok(Self {
            grid,
            placed,
            words,
            selected: None,
            focused: None,
            state: RoundState::new(config.timer_secs, tracked),
            max_suggestions: config.max_suggestions,
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

    pub fn wrong_count_for(&self, word_id: &str) -> u32 {
        self.state.word_wrong_count(word_id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn focused_cell(&self) -> Option<Position> {
        self.focused
    }

    pub fn completed_count(&self) -> usize {
        self.placed.iter().filter(|pw| pw.completed).count()
    }

    /// Leave the start screen; the first word is selected and the timer runs.
    pub fn start(&mut self) {
        self.state.start();
        if self.selected.is_none() {
            self.select_word(0, None);
        }
    }

    /// Tap on a cell: select the placed word owning it. When the cell is
    /// shared by two words and one of them is already selected, tapping
    /// toggles to the other. Returns the newly selected word index.
    pub fn select_cell(&mut self, pos: Position) -> Option<usize> {
        let owners: Vec<usize> = self
            .placed
            .iter()
            .enumerate()
            .filter(|(_, pw)| pw.covers(pos))
            .map(|(i, _)| i)
            .collect();

        let &first = owners.first()?;
        let target = if owners.len() > 1 && self.selected.is_some_and(|s| owners.contains(&s)) {
            owners
                .iter()
                .copied()
                .find(|&i| Some(i) != self.selected)
                .unwrap_or(first)
        } else {
            first
        };

        self.select_word(target, Some(pos));
        Some(target)
    }

    /// Select a word and move focus to the tapped cell, or else to the first
    /// cell still lacking a correct entry.
    pub fn select_word(&mut self, word_index: usize, focus: Option<Position>) {
        let Some(pw) = self.placed.get(word_index) else {
            return;
        };
        let target = focus
            .filter(|&pos| pw.covers(pos))
            .or_else(|| {
                pw.cells
                    .iter()
                    .copied()
                    .find(|&pos| !MatchValidator::cell_correct(&self.grid, pos))
            })
            .or_else(|| pw.cells.first().copied());

        self.selected = Some(word_index);
        self.focused = target;
    }

    /// Handle one keystroke against the focused cell. `Ok(None)` when no
    /// word/cell is focused.
    pub fn key_press(&mut self, input: KeyInput) -> Result<Option<KeyOutcome>, PuzzleError> {
        if !self.state.is_active() {
            return Err(PuzzleError::RoundNotActive);
        }
        let (word_index, cell) = match (self.selected, self.focused) {
            (Some(word_index), Some(cell)) => (word_index, cell),
            _ => return Ok(None),
        };

        match input {
            KeyInput::Backspace => {
                self.grid.set_user_input(cell, None);
                self.retreat_focus(word_index, cell);
                Ok(Some(KeyOutcome {
                    cell,
                    correct: None,
                    completed: None,
                    outcome: None,
                }))
            }
            KeyInput::Letter(raw) => {
                let ch = raw.to_uppercase().next().unwrap_or(raw);
                self.grid.set_user_input(cell, Some(ch));
                let correct = MatchValidator::cell_correct(&self.grid, cell);
                if !correct {
                    self.state.record_wrong();
                    let word_id = self.placed[word_index].word.id.clone();
                    self.state.record_word_wrong(&word_id);
                }

                let (completed, outcome) = self.complete_if_done(word_index);
                if completed.is_none() {
                    self.advance_focus(word_index, cell);
                }
                Ok(Some(KeyOutcome {
                    cell,
                    correct: Some(correct),
                    completed,
                    outcome,
                }))
            }
        }
    }

    /// Autocomplete candidates for the active word: same length, matching
    /// every typed letter, wildcards for empty cells. At most
    /// `max_suggestions`, in word-list order, unranked.
    pub fn suggestions(&self) -> Vec<&Word> {
        let Some(pw) = self.selected.and_then(|idx| self.placed.get(idx)) else {
            return Vec::new();
        };
        if pw.completed {
            return Vec::new();
        }

        let pattern: Vec<Option<char>> = pw
            .cells
            .iter()
            .map(|&pos| self.grid.user_input(pos))
            .collect();

        self.words
            .iter()
            .filter(|w| matches_pattern(&w.clean, &pattern))
            .take(self.max_suggestions)
            .collect()
    }

    /// Force-fill the active word with a suggestion's letters, overwriting
    /// every cell (even already-correct ones) and re-grading each. Wrongly
    /// filled cells count against the player exactly as mistyped letters do.
    pub fn apply_suggestion(&mut self, candidate: &str) -> Result<Option<FillOutcome>, PuzzleError> {
        if !self.state.is_active() {
            return Err(PuzzleError::RoundNotActive);
        }
        let Some(word_index) = self.selected else {
            return Ok(None);
        };
        // A completed word offers no suggestions; a stray fill must not
        // clobber its correct cells or move the wrong counters.
        if self.placed[word_index].completed {
            return Ok(None);
        }
        let cells = self.placed[word_index].cells.clone();
        let chars: Vec<char> = candidate.chars().collect();
        if chars.len() != cells.len() {
            return Ok(None);
        }

        let word_id = self.placed[word_index].word.id.clone();
        let mut wrong_cells = 0;
        for (&pos, &ch) in cells.iter().zip(chars.iter()) {
            self.grid.set_user_input(pos, Some(ch));
            if !MatchValidator::cell_correct(&self.grid, pos) {
                wrong_cells += 1;
                self.state.record_wrong();
                self.state.record_word_wrong(&word_id);
            }
        }

        let (completed, outcome) = self.complete_if_done(word_index);
        Ok(Some(FillOutcome {
            wrong_cells,
            completed,
            outcome,
        }))
    }

    /// One-second timer tick; yields the terminal outcome when time runs out.
    pub fn tick(&mut self) -> Option<RoundOutcome> {
        if self.state.tick() {
            Some(
                self.state
                    .time_out(self.completed_count(), self.placed.len()),
            )
        } else {
            None
        }
    }

    /// Completion fires once per word; on completion the next incomplete
    /// word (if any) is selected, or the round is won.
    fn complete_if_done(&mut self, word_index: usize) -> (Option<CompletedWord>, Option<RoundOutcome>) {
        if self.placed[word_index].completed
            || !MatchValidator::word_complete(&self.grid, &self.placed[word_index])
        {
            return (None, None);
        }

        self.placed[word_index].completed = true;
        let word_id = self.placed[word_index].word.id.clone();
        let track = WordTrack {
            word_id: word_id.clone(),
            correct: true,
            wrong_action: self.state.word_wrong_count(&word_id),
        };

        if self.completed_count() >= self.placed.len() {
            let outcome = self.state.win();
            (
                Some(CompletedWord {
                    word_index,
                    track,
                    next_word: None,
                }),
                Some(outcome),
            )
        } else {
            let next_word = self.placed.iter().position(|pw| !pw.completed);
            if let Some(next) = next_word {
                self.select_word(next, None);
            }
            (
                Some(CompletedWord {
                    word_index,
                    track,
                    next_word,
                }),
                None,
            )
        }
    }

    fn advance_focus(&mut self, word_index: usize, cell: Position) {
        let cells = &self.placed[word_index].cells;
        if let Some(idx) = cells.iter().position(|&c| c == cell) {
            if idx + 1 < cells.len() {
                self.focused = Some(cells[idx + 1]);
            }
        }
    }

    fn retreat_focus(&mut self, word_index: usize, cell: Position) {
        let cells = &self.placed[word_index].cells;
        if let Some(idx) = cells.iter().position(|&c| c == cell) {
            if idx > 0 {
                self.focused = Some(cells[idx - 1]);
            }
        }
    }
}

/// Does a candidate match the pattern, with `None` cells as wildcards?
fn matches_pattern(candidate: &str, pattern: &[Option<char>]) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    chars.len() == pattern.len()
        && pattern
            .iter()
            .zip(chars.iter())
            .all(|(slot, ch)| slot.map_or(true, |p| p == *ch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{normalize_words, PuzzleMode, RawWord};

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

    fn words(texts: &[&str]) -> Vec<Word> {
        let raws: Vec<RawWord> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| raw(&i.to_string(), t))
            .collect();
        normalize_words(&raws, PuzzleMode::Crossword, 20)
    }

    fn config() -> CrosswordConfig {
        CrosswordConfig::default()
    }

    /// All cells shared by two different placed words.
    fn intersections(placed: &[PlacedWord]) -> Vec<(usize, usize, Position)> {
        let mut shared = Vec::new();
        for a in 0..placed.len() {
            for b in (a + 1)..placed.len() {
                for &pos in &placed[a].cells {
                    if placed[b].covers(pos) {
                        shared.push((a, b, pos));
                    }
                }
            }
        }
        shared
    }

    fn letter_at(pw: &PlacedWord, pos: Position) -> char {
        let idx = pw.cell_index(pos).unwrap();
        pw.word.clean.chars().nth(idx).unwrap()
    }

    #[test]
    fn test_cat_act_intersect() {
        let (grid, placed) = CrosswordGenerator::generate(&words(&["cat", "act"]), &config()).unwrap();

        assert_eq!(placed.len(), 2);
        assert_ne!(placed[0].direction, placed[1].direction);

        let shared = intersections(&placed);
        assert_eq!(shared.len(), 1);
        let (a, b, pos) = shared[0];
        assert_eq!(letter_at(&placed[a], pos), letter_at(&placed[b], pos));
        assert_eq!(grid.letter(pos), Some(letter_at(&placed[a], pos)));

        // Two crossing three-letter words plus one cell of padding all round.
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
    }

    #[test]
    fn test_intersection_letters_always_agree() {
        let list = words(&["planet", "lantern", "torch", "night", "echo", "stone"]);
        let (grid, placed) = CrosswordGenerator::generate(&list, &config()).unwrap();

        for (a, b, pos) in intersections(&placed) {
            let la = letter_at(&placed[a], pos);
            assert_eq!(la, letter_at(&placed[b], pos));
            assert_eq!(grid.letter(pos), Some(la));
        }
    }

    #[test]
    fn test_remap_preserves_word_geometry() {
        let list = words(&["planet", "lantern", "torch", "night"]);
        let (grid, placed) = CrosswordGenerator::generate(&list, &config()).unwrap();

        for pw in &placed {
            assert_eq!(pw.cells.len(), pw.word.len());
            let (row_dir, col_dir) = pw.direction.delta();
            for window in pw.cells.windows(2) {
                assert_eq!(window[1].row as isize - window[0].row as isize, row_dir);
                assert_eq!(window[1].col as isize - window[0].col as isize, col_dir);
            }
            // Readback through the final grid reproduces the word.
            let read: String = pw.cells.iter().filter_map(|&p| grid.letter(p)).collect();
            assert_eq!(read, pw.word.clean);
            for &pos in &pw.cells {
                assert!(grid.contains(pos));
            }
        }
    }

    #[test]
    fn test_numbers_follow_placement_order() {
        let list = words(&["planet", "torch", "night"]);
        let (grid, placed) = CrosswordGenerator::generate(&list, &config()).unwrap();

        for (i, pw) in placed.iter().enumerate() {
            assert_eq!(pw.number, Some(i + 1));
            // The number is rendered on the word's first cell.
            let first = grid.get(pw.cells[0]).unwrap();
            assert_eq!(first.number, pw.number);
        }
    }

    #[test]
    fn test_disjoint_words_fall_back_disconnected() {
        // No shared letters anywhere: the second word cannot intersect.
        let (_, placed) = CrosswordGenerator::generate(&words(&["moon", "this"]), &config()).unwrap();

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[1].direction, Direction::Across);
        assert!(intersections(&placed).is_empty());
        // Fallback lands two rows below the last cell of the previous word.
        assert_eq!(placed[1].cells[0].row, placed[0].cells[0].row + 2);
    }

    #[test]
    fn test_empty_input_fails_generation() {
        assert!(matches!(
            CrosswordGenerator::generate(&[], &config()),
            Err(PuzzleError::GenerationFailed)
        ));
        assert!(matches!(
            CrosswordRound::new(Vec::new(), &config(), true),
            Err(PuzzleError::NoPlayableWords)
        ));
    }

    #[test]
    fn test_typing_through_to_win() {
        let mut round = CrosswordRound::new(words(&["cat", "act"]), &config(), true).unwrap();
        assert!(matches!(
            round.key_press(KeyInput::Letter('C')),
            Err(PuzzleError::RoundNotActive)
        ));

        round.start();
        assert_eq!(round.selected_index(), Some(0));

        let mut won = None;
        // Worst case: every letter of both words, shared cell already filled.
        for _ in 0..6 {
            let Some(word_index) = round.selected_index() else {
                break;
            };
            let Some(cell) = round.focused_cell() else { break };
            let idx = round.placed_words()[word_index].cell_index(cell).unwrap();
            let ch = round.placed_words()[word_index]
                .word
                .clean
                .chars()
                .nth(idx)
                .unwrap();
            let outcome = round.key_press(KeyInput::Letter(ch)).unwrap().unwrap();
            assert_eq!(outcome.correct, Some(true));
            if let Some(final_outcome) = outcome.outcome {
                won = Some(final_outcome);
                break;
            }
        }

        let won = won.expect("round should be won");
        assert!(won.won);
        assert_eq!(won.accuracy, 100);
        assert_eq!(round.phase(), Phase::Won);
        assert_eq!(round.completed_count(), 2);
    }

    #[test]
    fn test_wrong_letter_counts_and_reports_in_track() {
        let mut round = CrosswordRound::new(words(&["cat", "act"]), &config(), true).unwrap();
        round.start();

        let word_id = round.placed_words()[0].word.id.clone();
        let outcome = round.key_press(KeyInput::Letter('X')).unwrap().unwrap();
        assert_eq!(outcome.correct, Some(false));
        assert_eq!(round.wrong_attempts(), 1);
        assert_eq!(round.wrong_count_for(&word_id), 1);

        // Backspace from the advanced cell, then retype the word correctly.
        round.key_press(KeyInput::Backspace).unwrap();
        round.select_word(0, None);
        let clean = round.placed_words()[0].word.clean.clone();
        let mut completed = None;
        for ch in clean.chars() {
            let outcome = round.key_press(KeyInput::Letter(ch)).unwrap().unwrap();
            if outcome.completed.is_some() {
                completed = outcome.completed;
            }
        }
        let completed = completed.expect("word should complete");
        assert_eq!(completed.track.wrong_action, 1);
        assert!(completed.track.correct);
        assert_eq!(completed.next_word, Some(1));
        assert_eq!(round.selected_index(), Some(1));
    }

    #[test]
    fn test_shared_cell_tap_toggles_words() {
        let mut round = CrosswordRound::new(words(&["cat", "act"]), &config(), true).unwrap();
        round.start();

        let shared = intersections(round.placed_words())[0].2;

        let first = round.select_cell(shared).unwrap();
        let second = round.select_cell(shared).unwrap();
        let third = round.select_cell(shared).unwrap();
        assert_ne!(first, second);
        assert_eq!(first, third);
        assert_eq!(round.focused_cell(), Some(shared));
    }

    #[test]
    fn test_suggestions_filter_by_pattern() {
        let mut round = CrosswordRound::new(words(&["cat", "car", "dog"]), &config(), true).unwrap();
        round.start();

        // Active word is the first placed one; nothing typed yet, so every
        // same-length word matches the all-wildcard pattern.
        let all: Vec<String> = round.suggestions().iter().map(|w| w.clean.clone()).collect();
        assert!(all.contains(&"CAT".to_string()));
        assert!(all.contains(&"CAR".to_string()));
        assert!(all.contains(&"DOG".to_string()));

        // Typing narrows the pattern to literal prefixes.
        round.key_press(KeyInput::Letter('C')).unwrap();
        round.key_press(KeyInput::Letter('A')).unwrap();
        let narrowed: Vec<String> = round.suggestions().iter().map(|w| w.clean.clone()).collect();
        assert!(narrowed.contains(&"CAT".to_string()));
        assert!(narrowed.contains(&"CAR".to_string()));
        assert!(!narrowed.contains(&"DOG".to_string()));
    }

    #[test]
    fn test_wrong_suggestion_fill_counts_against_word() {
        let mut round = CrosswordRound::new(words(&["cat", "car"]), &config(), true).unwrap();
        round.start();

        let active = round.selected_index().unwrap();
        let active_clean = round.placed_words()[active].word.clean.clone();
        let active_id = round.placed_words()[active].word.id.clone();
        let wrong = if active_clean == "CAT" { "CAR" } else { "CAT" };

        let fill = round.apply_suggestion(wrong).unwrap().unwrap();
        assert_eq!(fill.wrong_cells, 1);
        assert!(fill.completed.is_none());
        // The counters moved even though no key was pressed.
        assert_eq!(round.wrong_attempts(), 1);
        assert_eq!(round.wrong_count_for(&active_id), 1);

        // Filling with the right candidate completes the word.
        let fill = round.apply_suggestion(&active_clean).unwrap().unwrap();
        assert_eq!(fill.wrong_cells, 0);
        assert!(fill.completed.is_some());
    }

    #[test]
    fn test_fill_on_completed_word_is_ignored() {
        let mut round = CrosswordRound::new(words(&["cat", "car"]), &config(), true).unwrap();
        round.start();

        let active = round.selected_index().unwrap();
        let active_clean = round.placed_words()[active].word.clean.clone();
        let active_id = round.placed_words()[active].word.id.clone();
        let other = if active_clean == "CAT" { "CAR" } else { "CAT" };

        round.apply_suggestion(&active_clean).unwrap();
        assert!(round.placed_words()[active].completed);

        // Re-select the finished word and try to fill it with a wrong
        // candidate: the fill is ignored outright.
        round.select_word(active, None);
        assert!(round.apply_suggestion(other).unwrap().is_none());
        assert_eq!(round.wrong_attempts(), 0);
        assert_eq!(round.wrong_count_for(&active_id), 0);
        let cells = &round.placed_words()[active].cells;
        assert!(cells
            .iter()
            .all(|&pos| MatchValidator::cell_correct(round.grid(), pos)));
    }

    #[test]
    fn test_timeout_with_partial_progress() {
        let mut round = CrosswordRound::new(words(&["cat", "act"]), &config(), true).unwrap();
        round.start();

        // Complete one of two words, then run the clock out.
        let clean = round.placed_words()[0].word.clean.clone();
        round.apply_suggestion(&clean).unwrap();
        assert_eq!(round.completed_count(), 1);

        let mut outcome = None;
        for _ in 0..config().timer_secs {
            outcome = round.tick();
            if outcome.is_some() {
                break;
            }
        }
        let outcome = outcome.expect("timer should expire");
        assert!(!outcome.won);
        assert_eq!(outcome.accuracy, 50);
        assert!(!outcome.passed);
        assert_eq!(round.phase(), Phase::TimedOut);
    }

    #[test]
    fn test_matches_pattern() {
        let pattern = [Some('C'), None, Some('T')];
        assert!(matches_pattern("CAT", &pattern));
        assert!(!matches_pattern("CAR", &pattern));
        assert!(!matches_pattern("CATS", &pattern));
        assert!(matches_pattern("DOG", &[None, None, None]));
    }
}
