//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per accepted frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, check_collision, first_collision};
pub use difficulty::advance_score;
pub use physics::{advance_actor, jump};
pub use state::{Actor, Cloud, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind};
pub use tick::{jump_actor, new_run, tick};
