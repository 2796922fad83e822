//! Fixed timestep simulation tick
//!
//! One step always runs in the same order: physics, entity spawn/update,
//! collision, difficulty.

use super::collision::first_collision;
use super::difficulty::advance_score;
use super::physics::{advance_actor, animate_bob, jump};
use super::spawn::{maybe_spawn_obstacle, seed_clouds, update_clouds, update_obstacles};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::GROUND_DASH_PERIOD;
use crate::tuning::Tuning;

/// Fresh running state: initial speed, actor on the ground, seeded clouds
pub fn new_run(seed: u64, tuning: &Tuning) -> GameState {
    let mut state = GameState::new(seed, tuning);
    state.phase = GamePhase::Running;
    seed_clouds(&mut state, tuning);
    state
}

/// Jump if the actor is grounded during a run
pub fn jump_actor(state: &mut GameState, tuning: &Tuning) -> bool {
    let running = state.is_running();
    jump(&mut state.actor, running, tuning.jump_impulse)
}

/// Advance a running game by one step. Does nothing unless running.
pub fn tick(state: &mut GameState, tuning: &Tuning) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }
    state.ticks += 1;

    // Physics
    advance_actor(&mut state.actor, tuning.gravity, tuning.ground_y());
    animate_bob(&mut state.actor);

    // Entities
    update_obstacles(&mut state.obstacles, state.speed);
    maybe_spawn_obstacle(state, tuning);
    update_clouds(&mut state.clouds, tuning.viewport_width, &mut state.rng);
    state.ground_offset = (state.ground_offset + state.speed) % GROUND_DASH_PERIOD;

    // Collision ends the run before the score step, freezing the score
    if let Some(hit) = first_collision(&state.actor, &state.obstacles, tuning.collision_padding) {
        let obstacle_id = hit.id;
        state.phase = GamePhase::Ended;
        log::info!(
            "Collision with obstacle {} at score {}",
            obstacle_id,
            state.score
        );
        events.push(GameEvent::Collision {
            obstacle_id,
            score: state.score,
        });
        return events;
    }

    // Difficulty
    if let Some(speed) = advance_score(state, tuning) {
        log::info!("Milestone {}: speed now {}", state.last_milestone, speed);
        events.push(GameEvent::Milestone {
            score: state.score,
            speed,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use glam::Vec2;

    fn running_state(seed: u64, tuning: &Tuning) -> GameState {
        new_run(seed, tuning)
    }

    #[test]
    fn test_jump_only_while_running() {
        let tuning = Tuning::default();
        let mut idle = GameState::new(1, &tuning);
        assert!(!jump_actor(&mut idle, &tuning));

        let mut state = running_state(1, &tuning);
        assert_eq!(state.clouds.len(), tuning.initial_clouds);
        assert!(jump_actor(&mut state, &tuning));
        tick(&mut state, &tuning);
        assert!(!state.actor.grounded);
        assert!(!jump_actor(&mut state, &tuning));
    }

    #[test]
    fn test_idle_state_does_not_advance() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        assert!(tick(&mut state, &tuning).is_empty());
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_first_tick_spawns_obstacle() {
        let tuning = Tuning::default();
        let mut state = running_state(5, &tuning);
        tick(&mut state, &tuning);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].pos.x, tuning.viewport_width);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_hundred_ticks_raise_speed_once() {
        let tuning = Tuning::default();
        let mut state = running_state(11, &tuning);
        let mut milestones = Vec::new();
        for _ in 0..100 {
            milestones.extend(tick(&mut state, &tuning));
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 100);
        assert_eq!(state.speed, tuning.base_speed + tuning.speed_step);
        assert_eq!(
            milestones,
            vec![GameEvent::Milestone {
                score: 100,
                speed: 5.5
            }]
        );
    }

    #[test]
    fn test_collision_freezes_score() {
        let tuning = Tuning::default();
        let mut state = running_state(2, &tuning);
        state.score = 41;
        let kind = ObstacleKind::TallCactus;
        let size = kind.size();
        // Lands on the actor after this tick's scroll
        state.obstacles.push(Obstacle {
            id: 99,
            kind,
            pos: Vec2::new(state.actor.pos.x + 20.0 + state.speed, tuning.ground_y() - size.y),
            size,
        });

        let events = tick(&mut state, &tuning);
        assert_eq!(
            events,
            vec![GameEvent::Collision {
                obstacle_id: 99,
                score: 41
            }]
        );
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.score, 41);

        // Ended games ignore further ticks
        assert!(tick(&mut state, &tuning).is_empty());
        assert_eq!(state.score, 41);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut a = running_state(99999, &tuning);
        let mut b = running_state(99999, &tuning);
        for _ in 0..500 {
            tick(&mut a, &tuning);
            tick(&mut b, &tuning);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_unattended_run_ends() {
        let tuning = Tuning::default();
        let mut state = running_state(7, &tuning);
        let mut collisions = 0;
        for _ in 0..20_000 {
            for event in tick(&mut state, &tuning) {
                if matches!(event, GameEvent::Collision { .. }) {
                    collisions += 1;
                }
            }
        }
        assert_eq!(collisions, 1);
        assert_eq!(state.phase, GamePhase::Ended);
    }
}
