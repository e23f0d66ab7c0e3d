use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Round lifecycle phases. `Loading` covers the session fetch before a round
/// exists; a constructed round starts at `Ready` (start screen) and moves to
/// `Active` when the grid is revealed and the timer starts running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Active,
    Won,
    TimedOut,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::TimedOut)
    }
}

/// A timed-out round still passes at this accuracy (boundary inclusive).
pub const PASS_THRESHOLD: u32 = 60;

/// Terminal result of a round, reported to the session collaborator and the
/// results overlay.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub won: bool,
    /// 0-100; always 100 on a win.
    pub accuracy: u32,
    pub wrong_attempts: u32,
    pub passed: bool,
    /// Retry is hidden when the round runs inside a tracked session.
    pub show_retry: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: DateTime<Utc>,
}

/// Shared mutable round state: phase, countdown, and wrong-attempt counters.
/// Created at round start and discarded when the round ends; retry builds a
/// fresh one.
#[derive(Debug)]
pub struct RoundState {
    phase: Phase,
    time_left: u32,
    wrong_attempts: u32,
    per_word_wrong: HashMap<String, u32>,
    started_at: Option<DateTime<Utc>>,
    tracked: bool,
}

impl RoundState {
    pub fn new(timer_secs: u32, tracked: bool) -> Self {
        Self {
            phase: Phase::Ready,
            time_left: timer_secs,
            wrong_attempts: 0,
            per_word_wrong: HashMap::new(),
            started_at: None,
            tracked,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Leave the start screen and start the countdown.
    pub fn start(&mut self) {
        if self.phase == Phase::Ready {
            self.phase = Phase::Active;
            self.started_at = Some(Utc::now());
        }
    }

    /// One-second timer tick; returns true when the countdown just expired.
    /// Ticks outside the active phase are ignored.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        self.time_left == 0
    }

    pub fn record_wrong(&mut self) {
        self.wrong_attempts += 1;
    }

    /// Count a wrong letter against one word; returns the new per-word total.
    pub fn record_word_wrong(&mut self, word_id: &str) -> u32 {
        let count = self.per_word_wrong.entry(word_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn word_wrong_count(&self, word_id: &str) -> u32 {
        self.per_word_wrong.get(word_id).copied().unwrap_or(0)
    }

    /// Accuracy as a rounded percentage of found words.
    pub fn accuracy(found: usize, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        ((found as f64 / total as f64) * 100.0).round() as u32
    }

    /// Every word was found before the timer expired.
    pub fn win(&mut self) -> RoundOutcome {
        self.finish(Phase::Won, 100)
    }

    /// The timer reached zero with partial progress.
    pub fn time_out(&mut self, found: usize, total: usize) -> RoundOutcome {
        self.finish(Phase::TimedOut, Self::accuracy(found, total))
    }

    fn finish(&mut self, phase: Phase, accuracy: u32) -> RoundOutcome {
        self.phase = phase;
        RoundOutcome {
            won: phase == Phase::Won,
            accuracy,
            wrong_attempts: self.wrong_attempts,
            passed: accuracy >= PASS_THRESHOLD,
            show_retry: !self.tracked,
            started_at: self.started_at,
            ended_at: Utc::now(),
        }
    }
}
