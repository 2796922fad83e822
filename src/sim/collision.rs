//! Collision detection for axis-aligned hitboxes
//!
//! Hitboxes are shrunk by a padding on every side before testing, so grazing
//! contact at the sprite edges does not end the run.

use glam::Vec2;

use super::state::{Actor, Obstacle};

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Shrink every side inward by `padding`
    #[inline]
    pub fn shrink(&self, padding: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(padding),
            max: self.max - Vec2::splat(padding),
        }
    }

    /// Strict overlap on both axes (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Check whether the actor's padded hitbox intersects the obstacle's
pub fn check_collision(actor: &Actor, obstacle: &Obstacle, padding: f32) -> bool {
    actor
        .bounds()
        .shrink(padding)
        .overlaps(&obstacle.bounds().shrink(padding))
}

/// First obstacle the actor collides with, in spawn order
pub fn first_collision<'a>(
    actor: &Actor,
    obstacles: &'a [Obstacle],
    padding: f32,
) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|obstacle| check_collision(actor, obstacle, padding))
}
