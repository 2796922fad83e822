//! Builds the per-frame draw list from game state

use glam::Vec2;

use super::shapes::{Frame, colors};
use crate::consts::GROUND_DASH_PERIOD;
use crate::sim::{Actor, Cloud, GameState, Obstacle, ObstacleKind};
use crate::tuning::Tuning;

/// Draw the whole scene. `sprite_ready` selects the character image over
/// the procedural fallback.
pub fn build_frame(state: &GameState, tuning: &Tuning, sprite_ready: bool, time_ms: f64) -> Frame {
    let mut frame = Frame::new();
    let width = tuning.viewport_width;
    let ground_y = tuning.ground_y();

    frame.rect(0.0, 0.0, width, tuning.viewport_height, colors::BACKGROUND);

    for cloud in &state.clouds {
        draw_cloud(&mut frame, cloud);
    }

    // Ground line and scrolling texture
    frame.rect(0.0, ground_y, width, 3.0, colors::GROUND);
    let mut x = -state.ground_offset;
    while x < width {
        frame.rect(x, ground_y + 10.0, 10.0, 2.0, colors::GROUND_DASH);
        x += GROUND_DASH_PERIOD;
    }

    for obstacle in &state.obstacles {
        draw_obstacle(&mut frame, obstacle);
    }

    draw_actor(&mut frame, &state.actor, sprite_ready, time_ms);
    frame
}

fn draw_cloud(frame: &mut Frame, cloud: &Cloud) {
    let p = cloud.pos.floor();
    let w = cloud.width;
    frame.circle(p, w / 3.0, colors::CLOUD);
    frame.circle(p + Vec2::new(w / 3.0, -5.0), w / 4.0, colors::CLOUD);
    frame.circle(p + Vec2::new(w / 2.0, 0.0), w / 3.0, colors::CLOUD);
}

fn draw_obstacle(frame: &mut Frame, obstacle: &Obstacle) {
    let Vec2 { x, y } = obstacle.pos.floor();
    match obstacle.kind {
        ObstacleKind::LowCactus | ObstacleKind::TallCactus => {
            let (w, h) = (obstacle.size.x, obstacle.size.y);
            frame.rect(x, y, w, h, colors::CACTUS);
            let arm_y = y + h * 0.3;
            frame.rect(x - 8.0, arm_y, 10.0, 8.0, colors::CACTUS_ARM);
            frame.rect(x + w - 2.0, arm_y + 10.0, 10.0, 8.0, colors::CACTUS_ARM);
        }
        ObstacleKind::Flyer { wing_offset, .. } => {
            // Body, head, beak, wing
            frame.rect(x + 10.0, y + 10.0, 20.0, 15.0, colors::FLYER);
            frame.rect(x + 30.0, y + 8.0, 10.0, 10.0, colors::FLYER);
            frame.triangle(
                Vec2::new(x + 40.0, y + 13.0),
                Vec2::new(x + 48.0, y + 15.0),
                Vec2::new(x + 40.0, y + 17.0),
                colors::BEAK,
            );
            frame.triangle(
                Vec2::new(x + 15.0, y + 15.0),
                Vec2::new(x + 25.0, y - 5.0 + wing_offset),
                Vec2::new(x + 30.0, y + 15.0),
                colors::FLYER,
            );
        }
    }
}

fn draw_actor(frame: &mut Frame, actor: &Actor, sprite_ready: bool, time_ms: f64) {
    let x = actor.pos.x.floor();
    let y = (actor.pos.y + actor.bob_offset).floor();

    if sprite_ready {
        frame.sprite(Vec2::new(x, y), actor.size);
        return;
    }

    let c = colors::DINO;
    frame.rect(x + 15.0, y + 15.0, 35.0, 30.0, c); // body
    frame.rect(x + 30.0, y + 5.0, 25.0, 25.0, c); // head
    frame.rect(x + 45.0, y + 10.0, 6.0, 6.0, colors::EYE);
    frame.rect(x + 47.0, y + 12.0, 3.0, 3.0, colors::PUPIL);

    if actor.grounded {
        let leg = ((time_ms / 100.0).sin() * 3.0) as f32;
        frame.rect(x + 20.0, y + 45.0 + leg, 8.0, 15.0 - leg, c);
        frame.rect(x + 35.0, y + 45.0 - leg, 8.0, 15.0 + leg, c);
    } else {
        frame.rect(x + 20.0, y + 40.0, 8.0, 10.0, c);
        frame.rect(x + 35.0, y + 40.0, 8.0, 10.0, c);
    }

    // Tail and arm
    frame.rect(x, y + 20.0, 20.0, 10.0, c);
    frame.rect(x - 5.0, y + 25.0, 10.0, 5.0, c);
    frame.rect(x + 45.0, y + 25.0, 10.0, 5.0, c);
}
