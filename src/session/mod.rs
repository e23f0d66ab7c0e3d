//! Client for the session-tracking collaborator.
//!
//! A round may run inside a learning session identified by a session id. The
//! session supplies the word list and language, and receives progress
//! reports: round start, one event per word as it is found or completed, and
//! the final accuracy. Only the initial fetch is awaited; every report is
//! fire-and-forget so a slow or dead collaborator can never stall gameplay.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::errors::PuzzleError;
use crate::game::round::RoundOutcome;
use crate::models::RawWord;

/// Session payload returned by the collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionData {
    /// BCP-47-ish language code ("en", "fr", ...) for speech synthesis.
    #[serde(default)]
    pub lang: Option<String>,
    pub words: Vec<RawWord>,
}

/// Per-word progress report. `wrong_action` is how many wrong letters were
/// typed into the word before it was completed; always 0 for word search,
/// where a word is either found or not.
#[derive(Debug, Clone, Serialize)]
pub struct WordTrack {
    #[serde(rename = "wordId")]
    pub word_id: String,
    pub correct: bool,
    pub wrong_action: u32,
}

/// Final round report.
#[derive(Debug, Clone, Serialize)]
pub struct CompletePayload {
    pub accuracy: u32,
    #[serde(rename = "wrongAttempts")]
    pub wrong_attempts: u32,
}

impl From<&RoundOutcome> for CompletePayload {
    fn from(outcome: &RoundOutcome) -> Self {
        Self {
            accuracy: outcome.accuracy,
            wrong_attempts: outcome.wrong_attempts,
        }
    }
}

pub struct SessionClient {
    base_url: String,
    session_id: String,
    http: reqwest::Client,
}

impl SessionClient {
    /// Requires a non-empty session id; without one there is nothing to
    /// fetch words from and the round cannot start.
    pub fn new(config: &SessionConfig, session_id: Option<&str>) -> Result<Self, PuzzleError> {
        let session_id = match session_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(PuzzleError::MissingSession),
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_id,
            http,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/api/session/{}{}", self.base_url, self.session_id, suffix)
    }

    /// Fetch the session's word list and language. This is the one awaited
    /// call; a failure here means the round cannot be built.
    pub async fn fetch(&self) -> Result<SessionData, PuzzleError> {
        let url = self.url("");
        debug!(%url, "fetching session");
        let data = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<SessionData>()
            .await?;
        Ok(data)
    }

    /// Report that the player left the start screen.
    pub fn mark_started(&self) {
        self.spawn_post(self.url("/start"), None::<()>);
    }

    /// Report one found/completed word.
    pub fn track_word(&self, track: WordTrack) {
        self.spawn_post(self.url("/track"), Some(track));
    }

    /// Report the round's final accuracy.
    pub fn complete(&self, outcome: &RoundOutcome) {
        self.spawn_post(self.url("/complete"), Some(CompletePayload::from(outcome)));
    }

    /// POST in a detached task. Failures are logged and dropped; tracking
    /// must never block or fail the round.
    fn spawn_post<T>(&self, url: String, payload: Option<T>)
    where
        T: Serialize + Send + 'static,
    {
        let http = self.http.clone();
        tokio::spawn(async move {
            let mut request = http.post(&url);
            if let Some(payload) = &payload {
                request = request.json(payload);
            }
            match request.send().await {
                Ok(response) => {
                    if let Err(err) = response.error_for_status() {
                        warn!(%url, %err, "session report rejected");
                    }
                }
                Err(err) => warn!(%url, %err, "session report failed"),
            }
        });
    }
}
