//! Procedural obstacle and cloud spawning
//!
//! The gap between obstacles is measured in distance, so it shrinks in time
//! as scroll speed rises.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Cloud, GameState, Obstacle, ObstacleKind};
use crate::tuning::Tuning;

/// Wing moves this much per tick
const WING_STEP: f32 = 0.5;
/// Wing reverses once its magnitude exceeds this
const WING_LIMIT: f32 = 5.0;

/// Pick an obstacle variant uniformly
pub fn choose_kind<R: Rng + ?Sized>(rng: &mut R) -> ObstacleKind {
    match rng.random_range(0..3) {
        0 => ObstacleKind::LowCactus,
        1 => ObstacleKind::TallCactus,
        _ => ObstacleKind::FLYER,
    }
}

/// Build an obstacle of the given kind at the right edge of the viewport
pub fn make_obstacle<R: Rng + ?Sized>(
    id: u32,
    kind: ObstacleKind,
    tuning: &Tuning,
    rng: &mut R,
) -> Obstacle {
    let size = kind.size();
    let ground_y = tuning.ground_y();
    let y = match kind {
        ObstacleKind::LowCactus | ObstacleKind::TallCactus => ground_y - size.y,
        ObstacleKind::Flyer { .. } => {
            let band = tuning.flyer_bands.choose(rng).copied().unwrap_or(0.0);
            ground_y - band
        }
    };
    Obstacle {
        id,
        kind,
        pos: Vec2::new(tuning.viewport_width, y),
        size,
    }
}

/// True when the most recent obstacle has scrolled far enough left
pub fn should_spawn<R: Rng + ?Sized>(obstacles: &[Obstacle], tuning: &Tuning, rng: &mut R) -> bool {
    match obstacles.last() {
        None => true,
        Some(last) => {
            let jitter = rng.random::<f32>() * tuning.spawn_jitter;
            last.pos.x < tuning.viewport_width - tuning.spawn_gap - jitter
        }
    }
}

/// Advance a flyer's wing animation
fn flap(kind: &mut ObstacleKind) {
    if let ObstacleKind::Flyer {
        wing_offset,
        wing_direction,
    } = kind
    {
        *wing_offset += WING_STEP * *wing_direction;
        if wing_offset.abs() > WING_LIMIT {
            *wing_direction = -*wing_direction;
        }
    }
}

/// Scroll obstacles, animate flyers, and drop the ones that left the screen
pub fn update_obstacles(obstacles: &mut Vec<Obstacle>, speed: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.pos.x -= speed;
        flap(&mut obstacle.kind);
    }
    obstacles.retain(|o| !o.is_offscreen());
}

/// Emit one obstacle if the spacing rule allows it
pub fn maybe_spawn_obstacle(state: &mut GameState, tuning: &Tuning) -> bool {
    if !should_spawn(&state.obstacles, tuning, &mut state.rng) {
        return false;
    }
    let kind = choose_kind(&mut state.rng);
    let id = state.next_entity_id();
    let obstacle = make_obstacle(id, kind, tuning, &mut state.rng);
    log::debug!("Spawned {:?} at y={}", obstacle.kind, obstacle.pos.y);
    state.obstacles.push(obstacle);
    true
}

/// A randomized cloud starting at `x`
pub fn make_cloud<R: Rng + ?Sized>(x: f32, rng: &mut R) -> Cloud {
    Cloud {
        pos: Vec2::new(x, rng.random::<f32>() * 100.0 + 20.0),
        width: rng.random::<f32>() * 40.0 + 40.0,
        speed: rng.random::<f32>() * 0.5 + 0.5,
    }
}

/// Fill the cloud pool with randomly placed clouds
pub fn seed_clouds(state: &mut GameState, tuning: &Tuning) {
    state.clouds.clear();
    for _ in 0..tuning.initial_clouds {
        let x = state.rng.random::<f32>() * tuning.viewport_width;
        let cloud = make_cloud(x, &mut state.rng);
        state.clouds.push(cloud);
    }
}

/// Scroll clouds; each one that leaves is replaced at the right edge
pub fn update_clouds<R: Rng + ?Sized>(clouds: &mut Vec<Cloud>, viewport_width: f32, rng: &mut R) {
    for cloud in clouds.iter_mut() {
        cloud.pos.x -= cloud.speed;
    }
    let before = clouds.len();
    clouds.retain(|c| !c.is_offscreen());
    for _ in clouds.len()..before {
        clouds.push(make_cloud(viewport_width, rng));
    }
}
