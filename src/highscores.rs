//! Client-side score records
//!
//! Persisted to LocalStorage:
//! - `dinoHighScore`: the single best score seen by this client
//! - `dinoLocalScores`: top 10 submissions kept when the remote leaderboard fails
//!
//! Stored lists are decoded entry by entry so one bad record does not cost the
//! rest. A list that is not an array at all is moved aside before being replaced.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError, load_json, save_json};

/// Maximum number of local fallback scores to keep
pub const MAX_LOCAL_SCORES: usize = 10;

/// When a score was submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Unix milliseconds
    Millis(f64),
    /// ISO 8601 text, as written by older pages sharing the same key
    Text(String),
}

/// A submitted score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
    pub timestamp: Timestamp,
}

impl ScoreRecord {
    /// Record stamped with Unix milliseconds
    pub fn new(name: impl Into<String>, score: u64, timestamp_ms: f64) -> Self {
        Self {
            name: name.into(),
            score,
            timestamp: Timestamp::Millis(timestamp_ms),
        }
    }
}

/// Best score seen by this client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    const STORAGE_KEY: &'static str = "dinoHighScore";

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Load the stored best score (0 when missing or unreadable)
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(text)) => match text.trim().parse::<u64>() {
                Ok(value) => Self { value },
                Err(e) => {
                    log::warn!("Ignoring unreadable high score {:?}: {}", text, e);
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("High score storage unavailable: {}", e);
                Self::default()
            }
        }
    }

    /// Record a final score. Returns true if it beat the previous best; the new
    /// value is kept in memory even if writing it out fails.
    pub fn record(&mut self, score: u64, store: &impl KeyValueStore) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        match store.set(Self::STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score: {}", score),
            Err(e) => log::warn!("Failed to persist high score {}: {}", score, e),
        }
        true
    }
}

/// Local fallback leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LocalScores {
    pub entries: Vec<ScoreRecord>,
}

impl LocalScores {
    const STORAGE_KEY: &'static str = "dinoLocalScores";
    /// Where an unreadable list is moved before a fresh one replaces it
    const BACKUP_KEY: &'static str = "dinoLocalScores.bak";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a record, keeping order and the size cap.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn insert(&mut self, record: ScoreRecord) -> Option<usize> {
        // Equal scores keep submission order
        let pos = self
            .entries
            .iter()
            .position(|e| record.score > e.score)
            .unwrap_or(self.entries.len());
        if pos >= MAX_LOCAL_SCORES {
            return None;
        }
        self.entries.insert(pos, record);
        self.entries.truncate(MAX_LOCAL_SCORES);
        Some(pos + 1)
    }

    /// Top `n` records
    pub fn top(&self, n: usize) -> Vec<ScoreRecord> {
        self.entries.iter().take(n).cloned().collect()
    }

    /// Load from storage; stored lists are re-sorted and capped.
    /// Malformed entries are skipped. Errors only when the stored value is not
    /// a JSON array.
    pub fn load(store: &impl KeyValueStore) -> Result<Self, StorageError> {
        let raw: Vec<serde_json::Value> = load_json(store, Self::STORAGE_KEY)?.unwrap_or_default();
        let mut entries: Vec<ScoreRecord> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping unreadable local score: {}", e);
                    None
                }
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_LOCAL_SCORES);
        Ok(Self { entries })
    }

    /// Load for updating. An unreadable list is copied to a backup key first so
    /// it can be replaced without being lost; if that copy fails, the error is
    /// returned and the stored list must be left alone.
    pub fn load_for_update(store: &impl KeyValueStore) -> Result<Self, StorageError> {
        match Self::load(store) {
            Ok(scores) => Ok(scores),
            Err(StorageError::Json(e)) => {
                log::warn!("Local scores unreadable ({}), moving them to {}", e, Self::BACKUP_KEY);
                let raw = store.get(Self::STORAGE_KEY)?.unwrap_or_default();
                store.set(Self::BACKUP_KEY, &raw)?;
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StorageError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Local scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
