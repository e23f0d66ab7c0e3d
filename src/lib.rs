//! Word-puzzle generation and validation engine.
//!
//! Turns a vocabulary word list into a populated letter grid (word search or
//! crossword) and interprets user gestures against that grid: drag selection
//! for word search, letter-by-letter typing with cell focus navigation for
//! crosswords. Rounds are timed, wrong attempts are counted, and outcomes are
//! reported to an external session-tracking collaborator.
//!
//! The engine is a pure in-memory computation driven by a UI shell: the shell
//! forwards pointer/keyboard events and one tick per second, renders the grid
//! it reads back, and plays any audio the engine requests. The only async
//! pieces are the initial session fetch and fire-and-forget tracking calls in
//! [`session`].

pub mod config;
pub mod errors;
pub mod game;
pub mod models;
pub mod session;
pub mod utils;

pub use config::Config;
pub use errors::PuzzleError;
pub use game::crossword::{CrosswordGenerator, CrosswordRound, KeyInput, KeyOutcome};
pub use game::round::{Phase, RoundOutcome};
pub use game::wordsearch::{SelectionOutcome, WordSearchGenerator, WordSearchRound};
pub use models::{Direction, Grid, PlacedWord, Position, Word};
pub use session::{SessionClient, SessionData, WordTrack};
