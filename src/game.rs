//! Game loop scheduler
//!
//! Owns the session and drives it from host frame callbacks:
//! Idle -> Running -> Ended -> (restart) -> Running.
//!
//! At most one frame callback is pending at a time. Its `FrameHandle` is the
//! only ticket to advance the simulation, so cancelling or replacing it makes
//! any late callback a no-op.

use crate::highscores::BestScore;
use crate::persistence::KeyValueStore;
use crate::platform::{FrameHandle, FrameHost, StartDebounce};
use crate::renderer::{Surface, build_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, jump_actor, new_run, tick};
use crate::tuning::Tuning;
use crate::ui::{SubmitState, Ui};

/// Everything the host page provides
pub trait Frontend: FrameHost + Ui + Surface {}

impl<T: FrameHost + Ui + Surface> Frontend for T {}

/// Game instance holding all session state
pub struct Game<F, K> {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    best: BestScore,
    storage: K,
    frontend: F,
    /// The one frame callback allowed to advance the game
    pending: Option<FrameHandle>,
    /// Timestamp of the last accepted frame
    last_frame_ms: Option<f64>,
    final_score: Option<u64>,
    start_gate: StartDebounce,
    seed: u64,
    runs: u64,
}

impl<F: Frontend, K: KeyValueStore> Game<F, K> {
    /// Load persisted scores/settings and show the start screen
    pub fn new(mut frontend: F, storage: K, tuning: Tuning, seed: u64) -> Self {
        let best = BestScore::load(&storage);
        let settings = Settings::load(&storage);

        frontend.set_high_score(best.value());
        frontend.show_end_screen(false);
        frontend.show_start_screen(true);

        Self {
            state: GameState::new(seed, &tuning),
            start_gate: StartDebounce::new(tuning.start_debounce_ms),
            tuning,
            settings,
            best,
            storage,
            frontend,
            pending: None,
            last_frame_ms: None,
            final_score: None,
            seed,
            runs: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn best_score(&self) -> u64 {
        self.best.value()
    }

    /// Score of the last finished run
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Whether a frame callback is scheduled
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Remember the name used for a submission
    pub fn remember_name(&mut self, name: &str) {
        if self.settings.last_name != name {
            self.settings.last_name = name.to_string();
            self.settings.save(&self.storage);
        }
    }

    /// Debounced start from a button, tap or key
    pub fn request_start(&mut self, now_ms: f64) -> bool {
        if !self.start_gate.accept(now_ms) {
            log::debug!("Start request debounced");
            return false;
        }
        self.start()
    }

    /// Begin a new run. A no-op while a run or frame callback is active.
    pub fn start(&mut self) -> bool {
        if self.state.is_running() || self.pending.is_some() {
            log::warn!("Game is already running");
            return false;
        }

        let seed = self.seed.wrapping_add(self.runs);
        self.runs += 1;
        self.state = new_run(seed, &self.tuning);
        self.last_frame_ms = None;
        self.final_score = None;

        self.frontend.show_start_screen(false);
        self.frontend.show_end_screen(false);
        self.frontend.set_score(0);
        self.frontend.set_submit_state(SubmitState::Idle);

        log::info!("Run {} started with seed {}", self.runs, seed);
        self.schedule()
    }

    /// Jump input; ignored unless the actor is grounded during a run
    pub fn request_jump(&mut self) -> bool {
        jump_actor(&mut self.state, &self.tuning)
    }

    /// Host frame callback
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp_ms: f64) {
        if self.pending != Some(handle) {
            log::debug!("Ignoring stale frame {:?}", handle);
            return;
        }
        self.pending = None;

        if !self.state.is_running() {
            self.last_frame_ms = None;
            return;
        }

        // Cap the simulation rate regardless of display refresh rate
        if let Some(last) = self.last_frame_ms {
            if timestamp_ms - last < self.tuning.min_frame_ms {
                self.schedule();
                return;
            }
        }

        self.last_frame_ms = Some(timestamp_ms);
        self.advance();
        self.draw(timestamp_ms);

        if self.state.is_running() {
            self.schedule();
        }
    }

    /// Ask the host for the next frame. If it refuses, the run cannot
    /// continue and the game drops back to the start screen.
    fn schedule(&mut self) -> bool {
        if let Some(stale) = self.pending.take() {
            self.frontend.cancel_frame(stale);
        }
        self.pending = self.frontend.request_frame();
        if self.pending.is_none() {
            log::error!("Frame clock unavailable - run abandoned");
            self.state.phase = GamePhase::Idle;
            self.last_frame_ms = None;
            self.frontend.show_end_screen(false);
            self.frontend.show_start_screen(true);
            return false;
        }
        true
    }

    fn advance(&mut self) {
        let events = tick(&mut self.state, &self.tuning);
        self.frontend.set_score(self.state.score);

        for event in events {
            match event {
                GameEvent::Milestone { .. } => {
                    if self.settings.effective_flash() {
                        self.frontend.flash(self.tuning.flash_ms);
                    }
                }
                GameEvent::Collision { .. } => self.stop(),
            }
        }
    }

    fn draw(&mut self, timestamp_ms: f64) {
        let frame = build_frame(
            &self.state,
            &self.tuning,
            self.frontend.sprite_ready(),
            timestamp_ms,
        );
        self.frontend.present(&frame);
    }

    /// End the run: cancel the next frame, record the score, show the end screen
    fn stop(&mut self) {
        self.state.phase = GamePhase::Ended;
        if let Some(handle) = self.pending.take() {
            self.frontend.cancel_frame(handle);
        }
        self.last_frame_ms = None;

        let score = self.state.score;
        self.final_score = Some(score);
        self.frontend.set_final_score(score);
        if self.best.record(score, &self.storage) {
            self.frontend.set_high_score(score);
        }
        self.frontend.show_end_screen(true);
        log::info!("Game over - final score {}", score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::renderer::Frame;
    use crate::sim::{Obstacle, ObstacleKind};
    use glam::Vec2;

    #[derive(Default)]
    struct FakeFrontend {
        refuse_frames: bool,
        next_handle: u32,
        scheduled: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
        start_visible: bool,
        end_visible: bool,
        end_shown: usize,
        score: u64,
        high_score_updates: Vec<u64>,
        final_score: Option<u64>,
        flashes: Vec<u32>,
        submit: Option<SubmitState>,
        presented: usize,
    }

    impl FrameHost for FakeFrontend {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            if self.refuse_frames {
                return None;
            }
            self.next_handle += 1;
            let handle = FrameHandle(self.next_handle);
            self.scheduled.push(handle);
            Some(handle)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.scheduled.retain(|h| *h != handle);
            self.cancelled.push(handle);
        }
    }

    impl Ui for FakeFrontend {
        fn show_start_screen(&mut self, visible: bool) {
            self.start_visible = visible;
        }
        fn show_end_screen(&mut self, visible: bool) {
            self.end_visible = visible;
            if visible {
                self.end_shown += 1;
            }
        }
        fn set_score(&mut self, score: u64) {
            self.score = score;
        }
        fn set_high_score(&mut self, score: u64) {
            self.high_score_updates.push(score);
        }
        fn set_final_score(&mut self, score: u64) {
            self.final_score = Some(score);
        }
        fn flash(&mut self, duration_ms: u32) {
            self.flashes.push(duration_ms);
        }
        fn set_submit_state(&mut self, state: SubmitState) {
            self.submit = Some(state);
        }
    }

    impl Surface for FakeFrontend {
        fn present(&mut self, _frame: &Frame) {
            self.presented += 1;
        }
    }

    type TestGame = Game<FakeFrontend, MemoryStore>;

    fn game_with_store(store: MemoryStore) -> TestGame {
        Game::new(FakeFrontend::default(), store, Tuning::default(), 1234)
    }

    fn game() -> TestGame {
        game_with_store(MemoryStore::new())
    }

    /// Fire every scheduled callback at `time`
    fn fire(game: &mut TestGame, time: f64) {
        let due: Vec<_> = game.frontend_mut().scheduled.drain(..).collect();
        for handle in due {
            game.on_frame(handle, time);
        }
    }

    /// Fire `n` frames spaced 17ms apart starting at `start`
    fn run_frames(game: &mut TestGame, start: f64, n: usize) -> f64 {
        let mut time = start;
        for _ in 0..n {
            fire(game, time);
            time += 17.0;
        }
        time
    }

    /// Place a tall cactus that overlaps the actor after the next scroll
    fn plant_collision(game: &mut TestGame) {
        let kind = ObstacleKind::TallCactus;
        let size = kind.size();
        let ground = game.tuning.ground_y();
        let x = game.state.actor.pos.x + 20.0 + game.state.speed;
        game.state.obstacles.push(Obstacle {
            id: 500,
            kind,
            pos: Vec2::new(x, ground - size.y),
            size,
        });
    }

    #[test]
    fn test_new_shows_start_screen() {
        let store = MemoryStore::new();
        store.set("dinoHighScore", "42").unwrap();
        let game = game_with_store(store);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.frontend().start_visible);
        assert_eq!(game.frontend().high_score_updates, [42]);
        assert!(!game.is_scheduled());
    }

    #[test]
    fn test_start_hides_screens_and_schedules() {
        let mut game = game();
        assert!(game.start());
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(!game.frontend().start_visible);
        assert_eq!(game.frontend().submit, Some(SubmitState::Idle));
        assert_eq!(game.state().clouds.len(), game.tuning().initial_clouds);
        assert_eq!(game.frontend().scheduled.len(), 1);
    }

    #[test]
    fn test_double_start_keeps_one_cycle() {
        let mut game = game();
        assert!(game.start());
        assert!(!game.start());
        assert_eq!(game.frontend().scheduled.len(), 1);

        run_frames(&mut game, 1000.0, 50);
        assert_eq!(game.state().score, 50);
        assert_eq!(game.frontend().scheduled.len(), 1);
    }

    #[test]
    fn test_frames_faster_than_cap_are_skipped() {
        let mut game = game();
        game.start();
        fire(&mut game, 1000.0);
        assert_eq!(game.state().score, 1);

        fire(&mut game, 1010.0);
        assert_eq!(game.state().score, 1);
        assert_eq!(game.frontend().scheduled.len(), 1);

        fire(&mut game, 1016.0);
        assert_eq!(game.state().score, 2);
        assert_eq!(game.frontend().presented, 2);
    }

    #[test]
    fn test_hundred_frames_raise_speed_and_flash() {
        let mut game = game();
        game.start();
        run_frames(&mut game, 0.0, 100);
        assert_eq!(game.state().score, 100);
        assert_eq!(game.state().speed, 5.5);
        assert_eq!(game.frontend().flashes, [900]);
        assert_eq!(game.frontend().score, 100);
    }

    #[test]
    fn test_reduced_motion_suppresses_flash() {
        let store = MemoryStore::new();
        store
            .set("dinoSettings", r#"{"reduced_motion": true}"#)
            .unwrap();
        let mut game = game_with_store(store);
        game.start();
        run_frames(&mut game, 0.0, 100);
        assert_eq!(game.state().speed, 5.5);
        assert!(game.frontend().flashes.is_empty());
    }

    #[test]
    fn test_collision_beats_lower_high_score() {
        let store = MemoryStore::new();
        store.set("dinoHighScore", "50").unwrap();
        let mut game = game_with_store(store);
        game.start();
        game.state.score = 75;
        plant_collision(&mut game);
        fire(&mut game, 100.0);

        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.final_score(), Some(75));
        assert_eq!(game.frontend().final_score, Some(75));
        assert_eq!(game.frontend().high_score_updates, [50, 75]);
        assert_eq!(game.best_score(), 75);
        assert_eq!(game.storage.get("dinoHighScore").unwrap().as_deref(), Some("75"));
        assert!(game.frontend().end_visible);
        assert!(!game.is_scheduled());
        assert!(game.frontend().scheduled.is_empty());
    }

    #[test]
    fn test_collision_below_high_score_keeps_it() {
        let store = MemoryStore::new();
        store.set("dinoHighScore", "100").unwrap();
        let mut game = game_with_store(store);
        game.start();
        game.state.score = 75;
        plant_collision(&mut game);
        fire(&mut game, 100.0);

        assert_eq!(game.final_score(), Some(75));
        assert_eq!(game.frontend().high_score_updates, [100]);
        assert_eq!(game.storage.get("dinoHighScore").unwrap().as_deref(), Some("100"));
    }

    #[test]
    fn test_unattended_run_ends_once() {
        let mut game = game();
        game.start();
        let mut time = 0.0;
        for _ in 0..20_000 {
            if game.phase() == GamePhase::Ended {
                break;
            }
            fire(&mut game, time);
            time += 17.0;
        }
        assert_eq!(game.phase(), GamePhase::Ended);
        let final_score = game.final_score().unwrap();
        assert_eq!(game.state().score, final_score);
        assert_eq!(game.frontend().end_shown, 1);
        assert_eq!(game.best_score(), final_score);

        // No cycle survives game over
        run_frames(&mut game, time, 10);
        assert_eq!(game.state().score, final_score);
        assert_eq!(game.frontend().end_shown, 1);
    }

    #[test]
    fn test_refused_frame_at_start_allows_retry() {
        let mut game = game();
        game.frontend_mut().refuse_frames = true;
        assert!(!game.start());
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.is_scheduled());
        assert!(game.frontend().start_visible);

        game.frontend_mut().refuse_frames = false;
        assert!(game.start());
        fire(&mut game, 0.0);
        assert_eq!(game.state().score, 1);
    }

    #[test]
    fn test_refused_frame_mid_run_abandons_run() {
        let mut game = game();
        game.start();
        run_frames(&mut game, 0.0, 5);
        assert_eq!(game.state().score, 5);

        game.frontend_mut().refuse_frames = true;
        fire(&mut game, 200.0);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.is_scheduled());
        assert_eq!(game.final_score(), None);
        assert_eq!(game.frontend().end_shown, 0);

        game.frontend_mut().refuse_frames = false;
        assert!(game.start());
        assert_eq!(game.state().score, 0);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut game = game();
        game.start();
        let first = game.frontend().scheduled[0];
        fire(&mut game, 0.0);
        assert_eq!(game.state().score, 1);

        // Replaying an already consumed callback does nothing
        game.on_frame(first, 100.0);
        assert_eq!(game.state().score, 1);
        assert_eq!(game.frontend().scheduled.len(), 1);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = game();
        game.start();
        let first_seed = game.state().seed;
        game.state.score = 10;
        plant_collision(&mut game);
        fire(&mut game, 0.0);
        assert_eq!(game.phase(), GamePhase::Ended);

        assert!(game.start());
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().speed, game.tuning().base_speed);
        assert!(game.state().obstacles.is_empty());
        assert_ne!(game.state().seed, first_seed);
        assert!(!game.frontend().end_visible);
        assert_eq!(game.final_score(), None);

        fire(&mut game, 5.0);
        assert_eq!(game.state().score, 1);
    }

    #[test]
    fn test_request_start_is_debounced() {
        let mut game = game();
        assert!(game.request_start(1000.0));
        game.state.score = 3;
        plant_collision(&mut game);
        fire(&mut game, 0.0);
        assert_eq!(game.phase(), GamePhase::Ended);

        // Touch and click from the same tap
        assert!(!game.request_start(1100.0));
        assert_eq!(game.phase(), GamePhase::Ended);
        assert!(game.request_start(1400.0));
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_jump_requires_running() {
        let mut game = game();
        assert!(!game.request_jump());
        game.start();
        assert!(game.request_jump());
        assert!(!game.request_jump());
    }

    #[test]
    fn test_remember_name_persists() {
        let mut game = game();
        game.remember_name("Ann");
        assert_eq!(game.settings().last_name, "Ann");
        assert_eq!(Settings::load(&game.storage).last_name, "Ann");
    }
}
