//! Firestore-backed remote store via the Firebase JS SDK loaded by the page

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use super::remote::{RemoteConfig, RemoteError, RemoteStore, TopListener};
use crate::highscores::ScoreRecord;

#[wasm_bindgen(inline_js = "
    const COLLECTION = 'leaderboard';
    let db = null;

    export function firestore_init(config) {
        if (typeof firebase === 'undefined') {
            return false;
        }
        if (!firebase.apps.length) {
            firebase.initializeApp(config);
        }
        db = firebase.firestore();
        return true;
    }

    export async function firestore_add(name, score) {
        await db.collection(COLLECTION).add({
            name: name,
            score: score,
            timestamp: firebase.firestore.FieldValue.serverTimestamp()
        });
    }

    function snapshot_json(snapshot) {
        const scores = [];
        snapshot.forEach(doc => {
            const data = doc.data();
            const ts = data.timestamp && data.timestamp.toMillis
                ? data.timestamp.toMillis()
                : Date.now();
            scores.push({ name: String(data.name), score: Number(data.score), timestamp: ts });
        });
        return JSON.stringify(scores);
    }

    export async function firestore_top(limit) {
        const snapshot = await db.collection(COLLECTION)
            .orderBy('score', 'desc')
            .limit(limit)
            .get();
        return snapshot_json(snapshot);
    }

    export function firestore_watch(limit, callback) {
        db.collection(COLLECTION)
            .orderBy('score', 'desc')
            .limit(limit)
            .onSnapshot(
                snapshot => callback(snapshot_json(snapshot)),
                error => console.error('Live leaderboard update failed:', error)
            );
    }
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn firestore_init(config: JsValue) -> Result<bool, JsValue>;

    #[wasm_bindgen(catch)]
    async fn firestore_add(name: &str, score: f64) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn firestore_top(limit: u32) -> Result<JsValue, JsValue>;

    fn firestore_watch(limit: u32, callback: &js_sys::Function);
}

/// Remote store backed by Firestore; inert when the SDK or config is missing
pub struct FirestoreBridge {
    ready: bool,
    /// Keeps live-update closures alive for the page lifetime
    watchers: RefCell<Vec<Closure<dyn FnMut(String)>>>,
}

impl FirestoreBridge {
    pub fn connect(config: &RemoteConfig) -> Self {
        let ready = if !config.is_configured() {
            log::info!("Firebase config missing - leaderboard will use local records");
            false
        } else {
            match serde_json::to_string(config)
                .ok()
                .and_then(|json| js_sys::JSON::parse(&json).ok())
            {
                Some(js_config) => match firestore_init(js_config) {
                    Ok(true) => {
                        log::info!("Firebase initialized");
                        true
                    }
                    Ok(false) => {
                        log::error!("Firebase SDK not loaded");
                        false
                    }
                    Err(e) => {
                        log::error!("Firebase initialization failed: {:?}", e);
                        false
                    }
                },
                None => {
                    log::error!("Could not encode Firebase config");
                    false
                }
            }
        };
        Self {
            ready,
            watchers: RefCell::new(Vec::new()),
        }
    }

    fn ensure_ready(&self) -> Result<(), RemoteError> {
        if self.ready {
            Ok(())
        } else {
            Err(RemoteError::NotConfigured)
        }
    }
}

fn decode(json: &str) -> Result<Vec<ScoreRecord>, RemoteError> {
    serde_json::from_str(json).map_err(|e| RemoteError::Decode(e.to_string()))
}

impl RemoteStore for FirestoreBridge {
    async fn add(&self, record: &ScoreRecord) -> Result<(), RemoteError> {
        self.ensure_ready()?;
        firestore_add(&record.name, record.score as f64)
            .await
            .map(|_| ())
            .map_err(|e| RemoteError::Backend(format!("{:?}", e)))
    }

    async fn top(&self, n: usize) -> Result<Vec<ScoreRecord>, RemoteError> {
        self.ensure_ready()?;
        let value = firestore_top(n as u32)
            .await
            .map_err(|e| RemoteError::Backend(format!("{:?}", e)))?;
        let json = value
            .as_string()
            .ok_or_else(|| RemoteError::Decode("expected a JSON string".to_string()))?;
        decode(&json)
    }

    fn watch_top(&self, n: usize, mut listener: TopListener) -> Result<(), RemoteError> {
        self.ensure_ready()?;
        let closure = Closure::<dyn FnMut(String)>::new(move |json: String| match decode(&json) {
            Ok(entries) => listener(entries),
            Err(e) => log::error!("Live leaderboard update dropped: {}", e),
        });
        firestore_watch(n as u32, closure.as_ref().unchecked_ref());
        self.watchers.borrow_mut().push(closure);
        Ok(())
    }
}
