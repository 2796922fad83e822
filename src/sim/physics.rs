//! Actor motion: gravity, ground contact, jumping

use super::state::Actor;

/// Bob speed per tick while running
const BOB_STEP: f32 = 0.3;
/// Bob reverses once its magnitude exceeds this
const BOB_LIMIT: f32 = 2.0;

/// Apply gravity, integrate, and resolve ground contact
pub fn advance_actor(actor: &mut Actor, gravity: f32, ground_y: f32) {
    actor.velocity_y += gravity;
    actor.pos.y += actor.velocity_y;

    let rest_y = actor.rest_y(ground_y);
    if actor.pos.y >= rest_y {
        actor.pos.y = rest_y;
        actor.velocity_y = 0.0;
        actor.jumping = false;
        actor.grounded = true;
    } else {
        actor.grounded = false;
    }
}

/// Running bob; flattens while airborne
pub fn animate_bob(actor: &mut Actor) {
    if actor.grounded {
        actor.bob_offset += BOB_STEP * actor.bob_direction;
        if actor.bob_offset.abs() > BOB_LIMIT {
            actor.bob_direction = -actor.bob_direction;
        }
    } else {
        actor.bob_offset = 0.0;
    }
}

/// Launch the actor upward. Returns false (and changes nothing) unless it is
/// standing on the ground during a run.
pub fn jump(actor: &mut Actor, running: bool, impulse: f32) -> bool {
    if !(actor.grounded && running) {
        return false;
    }
    actor.velocity_y = impulse;
    actor.jumping = true;
    actor.grounded = false;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn grounded_actor() -> (Actor, Tuning) {
        let tuning = Tuning::default();
        (Actor::new(&tuning), tuning)
    }

    #[test]
    fn test_jump_from_ground() {
        let (mut actor, tuning) = grounded_actor();
        assert!(jump(&mut actor, true, tuning.jump_impulse));
        assert_eq!(actor.velocity_y, tuning.jump_impulse);
        assert!(actor.jumping);
        assert!(!actor.grounded);
    }

    #[test]
    fn test_no_double_jump() {
        let (mut actor, tuning) = grounded_actor();
        jump(&mut actor, true, tuning.jump_impulse);
        advance_actor(&mut actor, tuning.gravity, tuning.ground_y());
        let before = actor.clone();

        assert!(!jump(&mut actor, true, tuning.jump_impulse));
        assert_eq!(actor.velocity_y, before.velocity_y);
        assert_eq!(actor.pos, before.pos);
        assert!(actor.jumping);
        assert!(!actor.grounded);
    }

    #[test]
    fn test_no_jump_when_not_running() {
        let (mut actor, tuning) = grounded_actor();
        assert!(!jump(&mut actor, false, tuning.jump_impulse));
        assert!(actor.grounded);
        assert_eq!(actor.velocity_y, 0.0);
    }

    #[test]
    fn test_jump_arc_lands() {
        let (mut actor, tuning) = grounded_actor();
        let rest = actor.pos.y;
        jump(&mut actor, true, tuning.jump_impulse);

        let mut airborne_ticks = 0;
        let mut apex = rest;
        loop {
            advance_actor(&mut actor, tuning.gravity, tuning.ground_y());
            apex = apex.min(actor.pos.y);
            if actor.grounded {
                break;
            }
            airborne_ticks += 1;
            assert!(airborne_ticks < 100, "actor never landed");
        }
        assert!(apex < rest - 100.0);
        assert_eq!(actor.pos.y, rest);
        assert!(!actor.jumping);
    }

    #[test]
    fn test_bob_oscillates_and_resets() {
        let (mut actor, _) = grounded_actor();
        for _ in 0..50 {
            animate_bob(&mut actor);
            assert!(actor.bob_offset.abs() <= BOB_LIMIT + BOB_STEP);
        }
        actor.grounded = false;
        animate_bob(&mut actor);
        assert_eq!(actor.bob_offset, 0.0);
    }

    proptest! {
        #[test]
        fn prop_ground_clamp(jump_at in proptest::collection::vec(any::<bool>(), 1..300)) {
            let (mut actor, tuning) = grounded_actor();
            let ground = tuning.ground_y();
            for want_jump in jump_at {
                if want_jump {
                    jump(&mut actor, true, tuning.jump_impulse);
                }
                advance_actor(&mut actor, tuning.gravity, ground);
                if actor.grounded {
                    prop_assert_eq!(actor.velocity_y, 0.0);
                    prop_assert_eq!(actor.pos.y, ground - actor.size.y);
                } else {
                    prop_assert!(actor.pos.y < ground - actor.size.y);
                }
            }
        }
    }
}
