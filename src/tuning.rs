//! Data-driven game balance
//!
//! Every magic number the simulation depends on lives here so it can be
//! overridden from JSON (LocalStorage key `dinoTuning` on web).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::KeyValueStore;

/// Invalid tuning values
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("max_speed ({max}) is below base_speed ({base})")]
    SpeedRange { base: f32, max: f32 },

    #[error("flyer_bands must not be empty")]
    NoFlyerBands,
}

/// Balance and layout constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Distance from the bottom of the viewport to the ground line
    pub ground_margin: f32,

    // === Actor ===
    pub actor_x: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_impulse: f32,

    // === Difficulty ===
    pub base_speed: f32,
    pub speed_step: f32,
    pub max_speed: f32,
    pub milestone_interval: u64,

    // === Spawning ===
    /// Minimum distance from the right edge before the next obstacle
    pub spawn_gap: f32,
    /// Random extra distance added to `spawn_gap`
    pub spawn_jitter: f32,
    /// Flyer altitudes, measured upward from the ground line
    pub flyer_bands: Vec<f32>,
    pub initial_clouds: usize,

    // === Collision ===
    /// Inward padding applied to every hitbox edge
    pub collision_padding: f32,

    // === Timing ===
    pub flash_ms: u32,
    pub min_frame_ms: f64,
    pub start_debounce_ms: f64,

    // === Leaderboard ===
    pub max_name_len: usize,
    pub leaderboard_size: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 300.0,
            ground_margin: 50.0,

            actor_x: 50.0,
            actor_width: 60.0,
            actor_height: 60.0,
            gravity: 0.8,
            jump_impulse: -15.0,

            base_speed: 5.0,
            speed_step: 0.5,
            max_speed: 15.0,
            milestone_interval: 100,

            spawn_gap: 300.0,
            spawn_jitter: 200.0,
            flyer_bands: vec![80.0, 50.0, 120.0],
            initial_clouds: 3,

            collision_padding: 10.0,

            flash_ms: 900,
            min_frame_ms: 16.0,
            start_debounce_ms: 300.0,

            max_name_len: 10,
            leaderboard_size: 10,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "dinoTuning";

    /// Y coordinate of the ground line
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.viewport_height - self.ground_margin
    }

    /// Parse and validate tuning from JSON; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("actor_width", self.actor_width),
            ("actor_height", self.actor_height),
            ("base_speed", self.base_speed),
            ("gravity", self.gravity),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if self.max_speed < self.base_speed {
            return Err(TuningError::SpeedRange {
                base: self.base_speed,
                max: self.max_speed,
            });
        }
        if self.flyer_bands.is_empty() {
            return Err(TuningError::NoFlyerBands);
        }
        Ok(())
    }

    /// Load tuning overrides, falling back to defaults on any problem
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(tuning) => match tuning.validate() {
                    Ok(()) => {
                        log::info!("Loaded tuning overrides");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning overrides: {}", e),
                },
                Err(e) => log::warn!("Failed to parse tuning overrides: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Tuning storage unavailable: {}", e),
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.ground_y(), 250.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"collision_padding": 4.0, "flash_ms": 500}"#).unwrap();
        assert_eq!(tuning.collision_padding, 4.0);
        assert_eq!(tuning.flash_ms, 500);
        assert_eq!(tuning.base_speed, 5.0);
    }

    #[test]
    fn test_validate_speed_range() {
        let tuning = Tuning {
            max_speed: 2.0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::SpeedRange {
                base: 5.0,
                max: 2.0
            })
        );
    }

    #[test]
    fn test_load_rejects_invalid_overrides() {
        let store = MemoryStore::new();
        store
            .set(Tuning::STORAGE_KEY, r#"{"viewport_width": -1.0}"#)
            .unwrap();
        assert_eq!(Tuning::load(&store), Tuning::default());

        store
            .set(Tuning::STORAGE_KEY, r#"{"spawn_gap": 250.0}"#)
            .unwrap();
        assert_eq!(Tuning::load(&store).spawn_gap, 250.0);
    }
}
