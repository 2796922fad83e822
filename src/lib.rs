//! Dino Dash - An endless-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, difficulty)
//! - `game`: Frame-driven scheduler and run lifecycle
//! - `renderer`: Draw list generation and the canvas surface
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `leaderboard`: Ranked score gateway with local fallback
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use highscores::{BestScore, LocalScores, ScoreRecord, Timestamp};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation steps per second when the host clock runs at full rate
    pub const TICK_RATE: f64 = 60.0;
    /// Milliseconds the submit button keeps its result label before resetting
    pub const SUBMIT_RESET_MS: u32 = 2000;
    /// Width of one dash in the scrolling ground texture
    pub const GROUND_DASH_PERIOD: f32 = 20.0;
}

/// Current wall-clock time in Unix milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in Unix milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
