//! Game state and core simulation types
//!
//! Entities are plain records; all behavior lives in the sibling modules.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run has started yet
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by a collision
    Ended,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_y: f32,
    pub jumping: bool,
    pub grounded: bool,
    /// Running bob (cosmetic, not part of the hitbox)
    pub bob_offset: f32,
    pub bob_direction: f32,
}

impl Actor {
    /// Actor standing on the ground
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.actor_width, tuning.actor_height);
        Self {
            pos: Vec2::new(tuning.actor_x, tuning.ground_y() - size.y),
            size,
            velocity_y: 0.0,
            jumping: false,
            grounded: true,
            bob_offset: 0.0,
            bob_direction: 1.0,
        }
    }

    /// Y coordinate of the top edge when standing on the ground
    #[inline]
    pub fn rest_y(&self, ground_y: f32) -> f32 {
        ground_y - self.size.y
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    LowCactus,
    TallCactus,
    /// Airborne obstacle with a flapping wing
    Flyer {
        wing_offset: f32,
        wing_direction: f32,
    },
}

impl ObstacleKind {
    /// A freshly spawned flyer
    pub const FLYER: ObstacleKind = ObstacleKind::Flyer {
        wing_offset: 0.0,
        wing_direction: 1.0,
    };

    /// Fixed hitbox size per variant
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::LowCactus => Vec2::new(20.0, 40.0),
            ObstacleKind::TallCactus => Vec2::new(30.0, 60.0),
            ObstacleKind::Flyer { .. } => Vec2::new(40.0, 30.0),
        }
    }
}

/// A hazard scrolling toward the actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Right edge has passed the left edge of the viewport
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Background parallax cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub width: f32,
    /// Horizontal speed, independent of scroll speed
    pub speed: f32,
}

impl Cloud {
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + self.width < 0.0
    }
}

/// Events emitted by a tick, consumed by the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Score crossed a multiple of the milestone interval
    Milestone { score: u64, speed: f32 },
    /// Actor hit an obstacle; the run is over
    Collision { obstacle_id: u32, score: u64 },
}

/// Complete session state, reset on every start
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// +1 per accepted tick while running
    pub score: u64,
    /// Horizontal displacement of obstacles per tick
    pub speed: f32,
    /// Largest milestone multiple reached so far
    pub last_milestone: u64,
    /// Accepted ticks since start
    pub ticks: u64,
    /// Ground texture scroll, in [0, GROUND_DASH_PERIOD)
    pub ground_offset: f32,
    pub actor: Actor,
    /// Ordered by spawn time; the last entry is the most recent
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    next_id: u32,
}

impl GameState {
    /// Fresh idle state with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            speed: tuning.base_speed,
            last_milestone: 0,
            ticks: 0,
            ground_offset: 0.0,
            actor: Actor::new(tuning),
            obstacles: Vec::new(),
            clouds: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_on_ground() {
        let tuning = Tuning::default();
        let state = GameState::new(7, &tuning);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.speed, tuning.base_speed);
        assert!(state.actor.grounded);
        assert_eq!(state.actor.pos.y, tuning.ground_y() - tuning.actor_height);
        assert_eq!(state.actor.velocity_y, 0.0);
    }

    #[test]
    fn test_offscreen_uses_right_edge() {
        let mut obstacle = Obstacle {
            id: 1,
            kind: ObstacleKind::LowCactus,
            pos: Vec2::new(-19.0, 0.0),
            size: ObstacleKind::LowCactus.size(),
        };
        assert!(!obstacle.is_offscreen());
        obstacle.pos.x = -20.5;
        assert!(obstacle.is_offscreen());
    }
}
