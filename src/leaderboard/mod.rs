//! Ranked score gateway
//!
//! Scores go to the remote leaderboard first. When it is unavailable they are
//! kept in the local top-10 list instead, and reads fall back the same way.
//! Nothing here ever blocks or fails the running game.

#[cfg(target_arch = "wasm32")]
mod firestore;
pub mod remote;

#[cfg(target_arch = "wasm32")]
pub use firestore::FirestoreBridge;
pub use remote::{MemoryRemote, RemoteConfig, RemoteError, RemoteStore, TopListener, Unconfigured};

use thiserror::Error;

use crate::highscores::{LocalScores, ScoreRecord};
use crate::persistence::KeyValueStore;

/// Rejected submissions
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name is {len} characters; at most {max} allowed")]
    NameTooLong { max: usize, len: usize },
}

/// A validated, trimmed player name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str, max_len: usize) -> Result<Self, LeaderboardError> {
        let name = raw.trim();
        let len = name.chars().count();
        if len == 0 {
            return Err(LeaderboardError::EmptyName);
        }
        if len > max_len {
            return Err(LeaderboardError::NameTooLong { max: max_len, len });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where a submission ended up
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Stored on the remote leaderboard
    Remote,
    /// Remote failed; stored in the local list instead
    LocalFallback(RemoteError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Remote)
    }
}

/// Origin of a standings list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    Local,
}

/// One displayed leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub rank: String,
    pub name: String,
    pub score: u64,
}

impl Row {
    /// Score with thousands separators
    pub fn score_label(&self) -> String {
        let digits = self.score.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }
}

/// Ordered top scores and where they came from
#[derive(Debug, Clone, PartialEq)]
pub struct Standings {
    pub source: Source,
    pub entries: Vec<ScoreRecord>,
}

impl Standings {
    pub fn is_local(&self) -> bool {
        self.source == Source::Local
    }

    /// Caption shown above fallback lists
    pub fn caption(&self) -> Option<&'static str> {
        self.is_local().then_some("Local records")
    }

    pub fn rows(&self) -> Vec<Row> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| Row {
                rank: rank_label(i + 1),
                name: entry.name.clone(),
                score: entry.score,
            })
            .collect()
    }
}

/// Medal for the podium, number otherwise
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => n.to_string(),
    }
}

/// Score gateway over a remote store and a local fallback list
pub struct Leaderboard<R, S> {
    remote: R,
    store: S,
    max_name_len: usize,
}

impl<R: RemoteStore, S: KeyValueStore> Leaderboard<R, S> {
    pub fn new(remote: R, store: S, max_name_len: usize) -> Self {
        Self {
            remote,
            store,
            max_name_len,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Validate a raw name as typed by the player
    pub fn validate_name(&self, raw: &str) -> Result<PlayerName, LeaderboardError> {
        PlayerName::parse(raw, self.max_name_len)
    }

    /// Submit a final score. Invalid names are rejected before any storage is
    /// touched; remote failures fall back to the local list.
    pub async fn submit(
        &self,
        raw_name: &str,
        score: u64,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        let name = self.validate_name(raw_name)?;
        let record = ScoreRecord::new(name.as_str(), score, crate::now_ms());

        match self.remote.add(&record).await {
            Ok(()) => {
                log::info!("Score {} saved for {}", score, record.name);
                Ok(SubmitOutcome::Remote)
            }
            Err(e) => {
                log::error!("Remote score save failed: {}", e);
                self.save_local(record);
                Ok(SubmitOutcome::LocalFallback(e))
            }
        }
    }

    fn save_local(&self, record: ScoreRecord) {
        let mut scores = match LocalScores::load_for_update(&self.store) {
            Ok(scores) => scores,
            Err(e) => {
                log::error!("Local scores left untouched, score not kept: {}", e);
                return;
            }
        };
        scores.insert(record);
        match scores.save(&self.store) {
            Ok(()) => log::info!("Score kept in local fallback list"),
            Err(e) => log::error!("Local fallback save failed: {}", e),
        }
    }

    fn local_scores(&self) -> LocalScores {
        LocalScores::load(&self.store).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable local scores: {}", e);
            LocalScores::new()
        })
    }

    /// Top `n` scores, remote first; falls back to the local list when the
    /// remote is unavailable or empty
    pub async fn fetch_top(&self, n: usize) -> Standings {
        match self.remote.top(n).await {
            Ok(entries) if !entries.is_empty() => {
                return Standings {
                    source: Source::Remote,
                    entries,
                };
            }
            Ok(_) => log::info!("Remote leaderboard empty, showing local records"),
            Err(RemoteError::NotConfigured) => {
                log::debug!("Remote leaderboard not configured, showing local records")
            }
            Err(e) => log::error!("Leaderboard load failed: {}", e),
        }
        Standings {
            source: Source::Local,
            entries: self.local_scores().top(n),
        }
    }

    /// Push remote top-N changes to `listener`. Returns false when the remote
    /// has no change feed; callers keep polling with `fetch_top` in that case.
    pub fn subscribe(&self, n: usize, mut listener: impl FnMut(Standings) + 'static) -> bool {
        let feed = Box::new(move |entries: Vec<ScoreRecord>| {
            listener(Standings {
                source: Source::Remote,
                entries,
            })
        });
        match self.remote.watch_top(n, feed) {
            Ok(()) => {
                log::info!("Live leaderboard updates enabled");
                true
            }
            Err(e) => {
                log::debug!("Live leaderboard updates unavailable: {}", e);
                false
            }
        }
    }
}
