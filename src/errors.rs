use thiserror::Error;

/// Errors surfaced by the puzzle engine.
///
/// Placement shortfalls (a word-search word that never finds a spot, a
/// crossword word placed disconnected) are recovered locally and logged, not
/// raised. The variants here are the failures the shell must show or handle.
#[derive(Error, Debug)]
pub enum PuzzleError {
    /// No session identifier was supplied; the round never starts.
    #[error("a session is required to start a round")]
    MissingSession,

    /// The word list is empty after filtering and normalization.
    #[error("no playable words after normalization")]
    NoPlayableWords,

    /// Crossword generation placed zero words.
    #[error("could not generate a crossword from the word list")]
    GenerationFailed,

    /// Input was delivered to a round that is not in the active phase.
    #[error("the round is not active")]
    RoundNotActive,

    /// The session collaborator could not be reached or answered with an error.
    #[error("session request failed: {0}")]
    Http(#[from] reqwest::Error),
}
