// Puzzle engine modules

pub mod crossword;
pub mod round;
pub mod selection;
pub mod validator;
pub mod wordsearch;

pub use crossword::{CrosswordGenerator, CrosswordRound};
pub use round::{Phase, RoundOutcome};
pub use selection::DragState;
pub use validator::MatchValidator;
pub use wordsearch::{WordSearchGenerator, WordSearchRound};
