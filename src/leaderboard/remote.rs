//! Remote ranked score stores

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::ScoreRecord;

/// Remote store failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    #[error("remote leaderboard is not configured")]
    NotConfigured,

    #[error("remote leaderboard does not support live updates")]
    Unsupported,

    #[error("backend error: {0}")]
    Backend(String),

    #[error("could not decode remote scores: {0}")]
    Decode(String),
}

/// Listener for live ranking changes
pub type TopListener = Box<dyn FnMut(Vec<ScoreRecord>)>;

/// An ordered document store: append, top-N by score, optional change feed
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn add(&self, record: &ScoreRecord) -> Result<(), RemoteError>;

    /// Highest `n` scores, descending
    async fn top(&self, n: usize) -> Result<Vec<ScoreRecord>, RemoteError>;

    /// Call `listener` with the current top `n` whenever it changes
    fn watch_top(&self, _n: usize, _listener: TopListener) -> Result<(), RemoteError> {
        Err(RemoteError::Unsupported)
    }
}

/// Firebase project settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

impl RemoteConfig {
    /// Placeholder left in unedited config files
    const PLACEHOLDER_KEY: &'static str = "YOUR_API_KEY";

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
            && self.api_key != Self::PLACEHOLDER_KEY
            && !self.project_id.is_empty()
    }
}

/// Remote store used when no backend is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct Unconfigured;

impl RemoteStore for Unconfigured {
    async fn add(&self, _record: &ScoreRecord) -> Result<(), RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn top(&self, _n: usize) -> Result<Vec<ScoreRecord>, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    fn watch_top(&self, _n: usize, _listener: TopListener) -> Result<(), RemoteError> {
        Err(RemoteError::NotConfigured)
    }
}

/// In-process remote store (native runs and tests)
#[derive(Default)]
pub struct MemoryRemote {
    records: RefCell<Vec<ScoreRecord>>,
    listeners: RefCell<Vec<(usize, TopListener)>>,
    offline: Cell<bool>,
    calls: Cell<usize>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a backend error
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Number of add/top calls received
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn begin_call(&self) -> Result<(), RemoteError> {
        self.calls.set(self.calls.get() + 1);
        if self.offline.get() {
            return Err(RemoteError::Backend("network unreachable".to_string()));
        }
        Ok(())
    }

    fn sorted_top(&self, n: usize) -> Vec<ScoreRecord> {
        let mut records = self.records.borrow().clone();
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(n);
        records
    }
}

impl RemoteStore for MemoryRemote {
    async fn add(&self, record: &ScoreRecord) -> Result<(), RemoteError> {
        self.begin_call()?;
        self.records.borrow_mut().push(record.clone());
        for (n, listener) in self.listeners.borrow_mut().iter_mut() {
            listener(self.sorted_top(*n));
        }
        Ok(())
    }

    async fn top(&self, n: usize) -> Result<Vec<ScoreRecord>, RemoteError> {
        self.begin_call()?;
        Ok(self.sorted_top(n))
    }

    fn watch_top(&self, n: usize, mut listener: TopListener) -> Result<(), RemoteError> {
        listener(self.sorted_top(n));
        self.listeners.borrow_mut().push((n, listener));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_config_placeholder_is_unconfigured() {
        let mut config = RemoteConfig {
            api_key: "YOUR_API_KEY".to_string(),
            project_id: "dino".to_string(),
            ..Default::default()
        };
        assert!(!config.is_configured());
        config.api_key = "abc123".to_string();
        assert!(config.is_configured());
    }

    #[test]
    fn test_config_reads_firebase_json() {
        let config: RemoteConfig =
            serde_json::from_str(r#"{"apiKey": "k", "projectId": "p", "appId": "a"}"#).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.app_id, "a");
        assert!(config.is_configured());
    }

    #[test]
    fn test_memory_remote_orders_and_notifies() {
        let remote = MemoryRemote::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            remote
                .watch_top(2, Box::new(move |top| seen.borrow_mut().push(top)))
                .unwrap();
        }
        pollster::block_on(async {
            remote.add(&ScoreRecord::new("a", 10, 0.0)).await.unwrap();
            remote.add(&ScoreRecord::new("b", 30, 0.0)).await.unwrap();
            remote.add(&ScoreRecord::new("c", 20, 0.0)).await.unwrap();
        });

        let top = pollster::block_on(remote.top(2)).unwrap();
        let scores: Vec<u64> = top.iter().map(|r| r.score).collect();
        assert_eq!(scores, [30, 20]);

        // Initial snapshot plus one per add
        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3], top);
    }

    #[test]
    fn test_unconfigured_always_fails() {
        let remote = Unconfigured;
        let result = pollster::block_on(remote.add(&ScoreRecord::new("a", 1, 0.0)));
        assert_eq!(result, Err(RemoteError::NotConfigured));
    }
}
