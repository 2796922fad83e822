//! Score-driven difficulty progression

use super::state::GameState;
use crate::tuning::Tuning;

/// Add one point and, on crossing a milestone, raise scroll speed.
///
/// Returns the new speed when a milestone was reached.
pub fn advance_score(state: &mut GameState, tuning: &Tuning) -> Option<f32> {
    state.score += 1;

    let interval = tuning.milestone_interval.max(1);
    if state.score - state.last_milestone < interval {
        return None;
    }
    state.last_milestone = (state.score / interval) * interval;
    state.speed = (state.speed + tuning.speed_step).min(tuning.max_speed);
    Some(state.speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_milestone_after_interval() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        for _ in 0..99 {
            assert_eq!(advance_score(&mut state, &tuning), None);
        }
        assert_eq!(advance_score(&mut state, &tuning), Some(5.5));
        assert_eq!(state.score, 100);
        assert_eq!(state.last_milestone, 100);
    }

    #[test]
    fn test_speed_is_capped() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        for _ in 0..10_000 {
            advance_score(&mut state, &tuning);
        }
        assert_eq!(state.speed, tuning.max_speed);
        assert_eq!(state.last_milestone, 10_000);
    }

    #[test]
    fn test_milestone_snaps_to_multiple() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        state.score = 249;
        state.last_milestone = 100;
        assert!(advance_score(&mut state, &tuning).is_some());
        assert_eq!(state.last_milestone, 200);
    }
}
