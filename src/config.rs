use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub word_search: WordSearchConfig,
    pub crossword: CrosswordConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordSearchConfig {
    /// Round duration in seconds.
    pub timer_secs: u32,
    /// At most this many words go into a puzzle.
    pub max_words: usize,
    /// Grid side bounds; the side is `longest word + 3` clamped to these.
    pub min_grid: usize,
    pub max_grid: usize,
    /// Random (direction, row, col) trials before a word is given up on.
    pub placement_trials: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrosswordConfig {
    /// Round duration in seconds.
    pub timer_secs: u32,
    /// At most this many words go into a puzzle.
    pub max_words: usize,
    /// Side length of the oversized scratch grid used during placement.
    pub scratch_size: usize,
    /// Cap on autocomplete suggestions returned per keystroke.
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub base_url: String,
    pub http_timeout_secs: u64,
}

impl Default for WordSearchConfig {
    fn default() -> Self {
        Self {
            timer_secs: 120,
            max_words: 8,
            min_grid: 8,
            max_grid: 15,
            placement_trials: 100,
        }
    }
}

impl Default for CrosswordConfig {
    fn default() -> Self {
        Self {
            timer_secs: 180,
            max_words: 20,
            scratch_size: 60,
            max_suggestions: 5,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_search: WordSearchConfig::default(),
            crossword: CrosswordConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the environment; every value has a default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let word_search = WordSearchConfig {
            timer_secs: env_or("WORD_SEARCH_TIMER_SECS", defaults.word_search.timer_secs)?,
            max_words: env_or("WORD_SEARCH_MAX_WORDS", defaults.word_search.max_words)?,
            min_grid: env_or("WORD_SEARCH_MIN_GRID", defaults.word_search.min_grid)?,
            max_grid: env_or("WORD_SEARCH_MAX_GRID", defaults.word_search.max_grid)?,
            placement_trials: env_or(
                "WORD_SEARCH_PLACEMENT_TRIALS",
                defaults.word_search.placement_trials,
            )?,
        };

        let crossword = CrosswordConfig {
            timer_secs: env_or("CROSSWORD_TIMER_SECS", defaults.crossword.timer_secs)?,
            max_words: env_or("CROSSWORD_MAX_WORDS", defaults.crossword.max_words)?,
            scratch_size: env_or("CROSSWORD_SCRATCH_SIZE", defaults.crossword.scratch_size)?,
            max_suggestions: env_or(
                "CROSSWORD_MAX_SUGGESTIONS",
                defaults.crossword.max_suggestions,
            )?,
        };

        let session = SessionConfig {
            base_url: env::var("SESSION_BASE_URL").unwrap_or(defaults.session.base_url),
            http_timeout_secs: env_or("SESSION_HTTP_TIMEOUT_SECS", defaults.session.http_timeout_secs)?,
        };

        Ok(Config {
            word_search,
            crossword,
            session,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.word_search.timer_secs, 120);
        assert_eq!(config.word_search.max_words, 8);
        assert_eq!(config.crossword.timer_secs, 180);
        assert_eq!(config.crossword.max_words, 20);
        assert_eq!(config.crossword.scratch_size, 60);
    }
}
