use crate::models::Position;

/// Ephemeral drag selection for word search. Lives only for the duration of
/// one pointer/touch gesture and is reset on every gesture boundary, so no
/// stale highlight state can leak between gestures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Selecting {
        anchor: Position,
        path: Vec<Position>,
    },
}

impl DragState {
    /// Pointer-down: anchor a new selection at the pressed cell.
    pub fn begin(&mut self, anchor: Position) {
        *self = DragState::Selecting {
            anchor,
            path: vec![anchor],
        };
    }

    /// Pointer-move: recompute the full straight-line path from the anchor to
    /// the hovered cell. Ignored while idle.
    pub fn update(&mut self, target: Position, width: usize, height: usize) {
        if let DragState::Selecting { anchor, path } = self {
            *path = straight_path(*anchor, target, width, height);
        }
    }

    /// Pointer-up: hand back the final path and reset to idle.
    pub fn release(&mut self) -> Option<Vec<Position>> {
        match std::mem::take(self) {
            DragState::Idle => None,
            DragState::Selecting { path, .. } => Some(path),
        }
    }

    /// Touch-cancel: discard the gesture entirely.
    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }

    pub fn path(&self) -> &[Position] {
        match self {
            DragState::Idle => &[],
            DragState::Selecting { path, .. } => path,
        }
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self, DragState::Selecting { .. })
    }
}

/// Build the straight-line path from `anchor` toward `target`.
///
/// Row and column deltas are independently normalized to -1/0/+1, so only
/// horizontal, vertical, and 45-degree diagonal paths are representable; any
/// other gesture snaps to the nearest such line. The path walks
/// `max(|d_row|, |d_col|)` steps and is truncated at the grid boundary.
pub fn straight_path(
    anchor: Position,
    target: Position,
    width: usize,
    height: usize,
) -> Vec<Position> {
    let row_diff = target.row as isize - anchor.row as isize;
    let col_diff = target.col as isize - anchor.col as isize;
    let steps = row_diff.abs().max(col_diff.abs());

    if steps == 0 {
        return vec![anchor];
    }

    let row_dir = row_diff.signum();
    let col_dir = col_diff.signum();

    let mut path = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        let row = anchor.row as isize + i * row_dir;
        let col = anchor.col as isize + i * col_dir;
        if row < 0 || col < 0 || row >= height as isize || col >= width as isize {
            break;
        }
        path.push(Position {
            row: row as usize,
            col: col as usize,
        });
    }
    path
}
