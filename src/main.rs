//! Dino Dash entry point
//!
//! Handles platform-specific initialization and wires the page to the game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, Document, Element, HtmlButtonElement, HtmlCanvasElement,
        HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use dino_dash::consts::SUBMIT_RESET_MS;
    use dino_dash::leaderboard::{FirestoreBridge, Leaderboard, RemoteConfig, Standings};
    use dino_dash::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use dino_dash::platform::{FrameCallback, FrameHandle, FrameHost, WebFrameHost};
    use dino_dash::renderer::{CanvasSurface, Frame, Surface};
    use dino_dash::ui::{SubmitState, Ui};
    use dino_dash::{Game, Tuning};

    const SPRITE_URL: &str = "assets/dino.png";

    type Store = Rc<dyn KeyValueStore>;
    type WebGame = Game<WebFrontend, Store>;
    type WebLeaderboard = Leaderboard<FirestoreBridge, Store>;

    fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))?
            .dyn_into::<T>()
            .map_err(|_| JsValue::from_str(&format!("#{} has the wrong element type", id)))
    }

    fn set_hidden(element: &Element, hidden: bool) {
        let classes = element.class_list();
        let _ = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
    }

    fn non_passive() -> AddEventListenerOptions {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        options
    }

    /// DOM overlay around the canvas
    struct DomUi {
        window: web_sys::Window,
        canvas: HtmlCanvasElement,
        start_screen: Element,
        end_screen: Element,
        current_score: Element,
        high_score: Element,
        final_score: Element,
        submit_button: HtmlButtonElement,
    }

    impl DomUi {
        fn new(
            window: &web_sys::Window,
            document: &Document,
            canvas: &HtmlCanvasElement,
        ) -> Result<Self, JsValue> {
            Ok(Self {
                window: window.clone(),
                canvas: canvas.clone(),
                start_screen: element(document, "start-screen")?,
                end_screen: element(document, "game-over-screen")?,
                current_score: element(document, "current-score")?,
                high_score: element(document, "high-score")?,
                final_score: element(document, "final-score")?,
                submit_button: element(document, "submit-score-btn")?,
            })
        }

        /// True when neither overlay covers the playfield
        fn screens_hidden(&self) -> bool {
            self.start_screen.class_list().contains("hidden")
                && self.end_screen.class_list().contains("hidden")
        }
    }

    impl Ui for DomUi {
        fn show_start_screen(&mut self, visible: bool) {
            set_hidden(&self.start_screen, !visible);
        }

        fn show_end_screen(&mut self, visible: bool) {
            set_hidden(&self.end_screen, !visible);
        }

        fn set_score(&mut self, score: u64) {
            self.current_score.set_text_content(Some(&format!("Score: {}", score)));
        }

        fn set_high_score(&mut self, score: u64) {
            self.high_score.set_text_content(Some(&format!("Best: {}", score)));
        }

        fn set_final_score(&mut self, score: u64) {
            self.final_score.set_text_content(Some(&score.to_string()));
        }

        fn flash(&mut self, duration_ms: u32) {
            let _ = self.canvas.class_list().add_1("flash-effect");
            let canvas = self.canvas.clone();
            let clear = Closure::once_into_js(move || {
                let _ = canvas.class_list().remove_1("flash-effect");
            });
            if let Err(e) = self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
                clear.unchecked_ref(),
                duration_ms as i32,
            ) {
                log::warn!("Failed to schedule flash reset: {:?}", e);
            }
        }

        fn set_submit_state(&mut self, state: SubmitState) {
            self.submit_button.set_text_content(Some(state.label()));
            self.submit_button.set_disabled(!state.enabled());
        }
    }

    /// Everything the browser provides to the game
    struct WebFrontend {
        host: WebFrameHost,
        surface: CanvasSurface,
        ui: DomUi,
    }

    impl FrameHost for WebFrontend {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            self.host.request_frame()
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.host.cancel_frame(handle)
        }
    }

    impl Surface for WebFrontend {
        fn sprite_ready(&self) -> bool {
            self.surface.sprite_ready()
        }

        fn present(&mut self, frame: &Frame) {
            self.surface.present(frame)
        }
    }

    impl Ui for WebFrontend {
        fn show_start_screen(&mut self, visible: bool) {
            self.ui.show_start_screen(visible)
        }
        fn show_end_screen(&mut self, visible: bool) {
            self.ui.show_end_screen(visible)
        }
        fn set_score(&mut self, score: u64) {
            self.ui.set_score(score)
        }
        fn set_high_score(&mut self, score: u64) {
            self.ui.set_high_score(score)
        }
        fn set_final_score(&mut self, score: u64) {
            self.ui.set_final_score(score)
        }
        fn flash(&mut self, duration_ms: u32) {
            self.ui.flash(duration_ms)
        }
        fn set_submit_state(&mut self, state: SubmitState) {
            self.ui.set_submit_state(state)
        }
    }

    fn open_storage() -> Store {
        match LocalStorage::open() {
            Some(storage) => Rc::new(storage),
            None => {
                log::warn!("LocalStorage unavailable - scores will not persist");
                Rc::new(MemoryStore::new())
            }
        }
    }

    /// Firebase settings published by the page as `window.firebaseConfig`
    fn remote_config(window: &web_sys::Window) -> RemoteConfig {
        let value = match js_sys::Reflect::get(window, &JsValue::from_str("firebaseConfig")) {
            Ok(value) if value.is_object() => value,
            _ => return RemoteConfig::default(),
        };
        let json = js_sys::JSON::stringify(&value)
            .ok()
            .and_then(|s| s.as_string())
            .unwrap_or_default();
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::error!("Invalid firebaseConfig: {}", e);
            RemoteConfig::default()
        })
    }

    /// Replace the leaderboard list contents; entries go through text nodes only
    fn render_standings(
        document: &Document,
        list: &Element,
        standings: &Standings,
    ) -> Result<(), JsValue> {
        list.set_text_content(None);

        let note = |text: &str| -> Result<(), JsValue> {
            let p = document.create_element("p")?;
            p.set_class_name("loading");
            p.set_text_content(Some(text));
            list.append_child(&p)?;
            Ok(())
        };

        if standings.entries.is_empty() {
            note("No records yet.")?;
            if standings.is_local() {
                note("Configure Firebase to enable the online leaderboard.")?;
            }
            return Ok(());
        }

        if let Some(caption) = standings.caption() {
            let p = document.create_element("p")?;
            p.set_class_name("caption");
            p.set_text_content(Some(caption));
            list.append_child(&p)?;
        }

        for row in standings.rows() {
            let item = document.create_element("div")?;
            item.set_class_name("leaderboard-item");
            let cells = [
                ("rank", row.rank.clone()),
                ("name", row.name.clone()),
                ("score", row.score_label()),
            ];
            for (class, text) in cells {
                let span = document.create_element("span")?;
                span.set_class_name(class);
                span.set_text_content(Some(&text));
                item.append_child(&span)?;
            }
            list.append_child(&item)?;
        }
        Ok(())
    }

    async fn refresh_leaderboard(
        leaderboard: &WebLeaderboard,
        document: &Document,
        list: &Element,
        n: usize,
    ) {
        list.set_text_content(Some("Loading..."));
        let standings = leaderboard.fetch_top(n).await;
        if let Err(e) = render_standings(document, list, &standings) {
            log::error!("Failed to render leaderboard: {:?}", e);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dino Dash starting...");
        if let Err(e) = setup().await {
            log::error!("Startup failed: {:?}", e);
        }
    }

    async fn setup() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = element(&document, "gameCanvas")?;

        let storage = open_storage();
        let tuning = Tuning::load(&storage);
        canvas.set_width(tuning.viewport_width as u32);
        canvas.set_height(tuning.viewport_height as u32);

        let surface = CanvasSurface::new(&canvas, SPRITE_URL)?;
        let ui = DomUi::new(&window, &document, &canvas)?;
        let seed = js_sys::Date::now() as u64;
        let size = tuning.leaderboard_size;
        let max_name_len = tuning.max_name_len;

        let game: Rc<RefCell<WebGame>> = Rc::new_cyclic(|weak| {
            let weak = weak.clone();
            let on_frame: FrameCallback = Rc::new(move |handle: FrameHandle, time: f64| {
                if let Some(game) = weak.upgrade() {
                    game.borrow_mut().on_frame(handle, time);
                }
            });
            let frontend = WebFrontend {
                host: WebFrameHost::new(window.clone(), on_frame),
                surface,
                ui,
            };
            RefCell::new(Game::new(frontend, storage.clone(), tuning, seed))
        });

        let leaderboard = Rc::new(Leaderboard::new(
            FirestoreBridge::connect(&remote_config(&window)),
            storage,
            max_name_len,
        ));
        let list: Element = element(&document, "leaderboard-list")?;

        setup_start_buttons(&document, game.clone())?;
        setup_input_handlers(&document, &canvas, game.clone());
        setup_submit(&window, &document, game.clone(), leaderboard.clone(), list.clone())?;

        {
            let document = document.clone();
            let list = list.clone();
            leaderboard.subscribe(size, move |standings| {
                if let Err(e) = render_standings(&document, &list, &standings) {
                    log::error!("Failed to render leaderboard: {:?}", e);
                }
            });
        }
        refresh_leaderboard(&leaderboard, &document, &list, size).await;

        log::info!("Ready");
        Ok(())
    }

    fn setup_start_buttons(document: &Document, game: Rc<RefCell<WebGame>>) -> Result<(), JsValue> {
        for id in ["start-btn", "restart-btn"] {
            let button: HtmlButtonElement = element(document, id)?;

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().request_start(js_sys::Date::now());
                });
                let _ = button.add_event_listener_with_callback(
                    "click",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().request_start(js_sys::Date::now());
                });
                let _ = button.add_event_listener_with_callback_and_add_event_listener_options(
                    "touchend",
                    closure.as_ref().unchecked_ref(),
                    &non_passive(),
                );
                closure.forget();
            }
        }
        Ok(())
    }

    fn setup_input_handlers(
        document: &Document,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<WebGame>>,
    ) {
        // Keyboard: Space / ArrowUp
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() != "Space" && event.code() != "ArrowUp" {
                    return;
                }
                // Leave typing in the name field alone
                let typing = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if typing {
                    return;
                }
                event.prevent_default();

                let mut g = game.borrow_mut();
                if g.state().is_running() {
                    g.request_jump();
                } else if g.frontend().ui.screens_hidden() {
                    g.request_start(js_sys::Date::now());
                }
            });
            let _ = document.add_event_listener_with_callback(
                "keydown",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // One jump per touch
        let touch_held = Rc::new(Cell::new(false));
        {
            let game = game.clone();
            let touch_held = touch_held.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                event.stop_propagation();
                if !touch_held.get() && game.borrow_mut().request_jump() {
                    touch_held.set(true);
                }
            });
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &non_passive(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                touch_held.set(false);
            });
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchend",
                closure.as_ref().unchecked_ref(),
                &non_passive(),
            );
            closure.forget();
        }

        // No page scrolling while playing
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
            });
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                closure.as_ref().unchecked_ref(),
                &non_passive(),
            );
            closure.forget();
        }

        // Mouse click (desktop)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().request_jump();
            });
            let _ = canvas.add_event_listener_with_callback(
                "click",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_submit(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<WebGame>>,
        leaderboard: Rc<WebLeaderboard>,
        list: Element,
    ) -> Result<(), JsValue> {
        let button: HtmlButtonElement = element(document, "submit-score-btn")?;
        let input: HtmlInputElement = element(document, "player-name")?;
        input.set_max_length(leaderboard_name_limit(&game) as i32);
        input.set_value(&game.borrow().settings().last_name);

        {
            let window = window.clone();
            let document = document.clone();
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                submit_score(
                    &window,
                    &document,
                    &input,
                    game.clone(),
                    leaderboard.clone(),
                    list.clone(),
                );
            });
            let _ = button.add_event_listener_with_callback(
                "click",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Enter submits
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Enter" {
                    button.click();
                }
            });
            let _ = input.add_event_listener_with_callback(
                "keydown",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
        Ok(())
    }

    fn leaderboard_name_limit(game: &Rc<RefCell<WebGame>>) -> usize {
        game.borrow().tuning().max_name_len
    }

    fn submit_score(
        window: &web_sys::Window,
        document: &Document,
        input: &HtmlInputElement,
        game: Rc<RefCell<WebGame>>,
        leaderboard: Rc<WebLeaderboard>,
        list: Element,
    ) {
        let name = match leaderboard.validate_name(&input.value()) {
            Ok(name) => name,
            Err(e) => {
                log::info!("Submission rejected: {}", e);
                let limit = leaderboard_name_limit(&game);
                let message = format!("Please enter a name (up to {} characters)", limit);
                let _ = window.alert_with_message(&message);
                return;
            }
        };
        let Some(score) = game.borrow().final_score() else {
            log::warn!("No finished run to submit");
            return;
        };

        {
            let mut g = game.borrow_mut();
            g.remember_name(name.as_str());
            g.frontend_mut().set_submit_state(SubmitState::Submitting);
        }

        let window = window.clone();
        let document = document.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let state = match leaderboard.submit(name.as_str(), score).await {
                Ok(outcome) if outcome.is_success() => SubmitState::Succeeded,
                Ok(_) => SubmitState::Failed,
                Err(e) => {
                    log::warn!("Submission rejected: {}", e);
                    SubmitState::Failed
                }
            };
            game.borrow_mut().frontend_mut().set_submit_state(state);

            let size = game.borrow().tuning().leaderboard_size;
            refresh_leaderboard(&leaderboard, &document, &list, size).await;

            let reset = Closure::once_into_js(move || {
                game.borrow_mut().frontend_mut().set_submit_state(SubmitState::Idle);
            });
            if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                reset.unchecked_ref(),
                SUBMIT_RESET_MS as i32,
            ) {
                log::warn!("Failed to schedule submit reset: {:?}", e);
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::VecDeque;

    use dino_dash::consts::TICK_RATE;
    use dino_dash::persistence::MemoryStore;
    use dino_dash::platform::{FrameHandle, FrameHost};
    use dino_dash::renderer::{Frame, Surface};
    use dino_dash::sim::{GamePhase, GameState};
    use dino_dash::ui::{SubmitState, Ui};
    use dino_dash::{Game, LocalScores, ScoreRecord, Tuning};

    /// Safety stop for runs the auto-jumper survives indefinitely
    const MAX_FRAMES: u64 = 200_000;

    /// Frame host driven by a synthetic clock
    #[derive(Default)]
    struct HeadlessFrontend {
        queue: VecDeque<FrameHandle>,
        next_handle: u32,
        shapes_drawn: usize,
        flashes: u32,
    }

    impl FrameHost for HeadlessFrontend {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            self.next_handle += 1;
            let handle = FrameHandle(self.next_handle);
            self.queue.push_back(handle);
            Some(handle)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.queue.retain(|h| *h != handle);
        }
    }

    impl Ui for HeadlessFrontend {
        fn show_start_screen(&mut self, _visible: bool) {}
        fn show_end_screen(&mut self, visible: bool) {
            if visible {
                log::info!("Game over screen shown");
            }
        }
        fn set_score(&mut self, _score: u64) {}
        fn set_high_score(&mut self, score: u64) {
            log::info!("High score: {}", score);
        }
        fn set_final_score(&mut self, _score: u64) {}
        fn flash(&mut self, _duration_ms: u32) {
            self.flashes += 1;
        }
        fn set_submit_state(&mut self, _state: SubmitState) {}
    }

    impl Surface for HeadlessFrontend {
        fn present(&mut self, frame: &Frame) {
            self.shapes_drawn += frame.len();
        }
    }

    /// Jump when a ground-level obstacle is about to reach the actor
    fn should_jump(state: &GameState, tuning: &Tuning) -> bool {
        let actor = state.actor.bounds().shrink(tuning.collision_padding);
        let reach = state.speed * 10.0;
        state.obstacles.iter().any(|ob| {
            let hitbox = ob.bounds().shrink(tuning.collision_padding);
            let gap = hitbox.min.x - actor.max.x;
            let low_enough = hitbox.max.y > actor.min.y;
            (0.0..reach).contains(&gap) && low_enough
        })
    }

    pub fn run(seed: u64) {
        let tuning = Tuning::default();
        let store = MemoryStore::new();
        let mut game = Game::new(HeadlessFrontend::default(), &store, tuning.clone(), seed);

        game.start();
        let frame_ms = 1000.0 / TICK_RATE;
        let mut time = 0.0;
        let mut frames = 0u64;
        let mut jumps = 0u32;

        while game.phase() == GamePhase::Running && frames < MAX_FRAMES {
            if should_jump(game.state(), game.tuning()) && game.request_jump() {
                jumps += 1;
            }
            let Some(handle) = game.frontend_mut().queue.pop_front() else {
                log::error!("Frame loop stalled");
                break;
            };
            game.on_frame(handle, time);
            time += frame_ms;
            frames += 1;
        }

        let score = game.final_score().unwrap_or(game.state().score);
        let mut scores = LocalScores::new();
        let rank = scores.insert(ScoreRecord::new("auto", score, dino_dash::now_ms()));

        println!("Seed:          {}", seed);
        println!("Final score:   {}", score);
        println!("Final speed:   {:.1}", game.state().speed);
        println!("Jumps:         {}", jumps);
        println!("Milestones:    {}", game.frontend().flashes);
        println!("Shapes drawn:  {}", game.frontend().shapes_drawn);
        println!("Local rank:    {:?}", rank);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dino Dash (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in a browser");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
