//! Player preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Flash the playfield at every score milestone
    pub flash_effect: bool,
    /// Reduced motion (suppresses flashes)
    pub reduced_motion: bool,
    /// Name last used for a leaderboard submission
    pub last_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flash_effect: true,
            reduced_motion: false,
            last_name: String::new(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "dinoSettings";

    /// Effective milestone flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.flash_effect && !self.reduced_motion
    }

    /// Load settings, using defaults when nothing usable is stored
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
