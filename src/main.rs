//! Polarity Twins entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use polarity_twins::consts::*;
    use polarity_twins::platform::Keyboard;
    use polarity_twins::render::Renderer;
    use polarity_twins::sim::rules::WinProgress;
    use polarity_twins::sim::{levels, tick, GamePhase, LevelState};
    use polarity_twins::{Settings, Snapshot};

    /// Game instance holding all state
    struct Game {
        state: LevelState,
        renderer: Option<Renderer>,
        settings: Settings,
        keyboard: Keyboard,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for auto-save
        last_phase: GamePhase,
    }

    impl Game {
        fn new(level: u32, seed: u64) -> Self {
            let state = levels::load(level, seed).unwrap_or_else(|| levels::level1(seed));
            Self {
                state,
                renderer: None,
                settings: Settings::load(),
                keyboard: Keyboard::new(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Playing,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut input = self.keyboard.snapshot();
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                for p in &mut input.players {
                    p.jump = false;
                    p.dash = false;
                }
                input.pause = false;
                input.reset = false;
            }
            // Press edges persist across frames that ran no substep (a
            // display faster than the sim rate produces them every other
            // frame); only a consumed tick retires them
            if substeps > 0 {
                self.keyboard.consume_presses();
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // Auto-save on pause, clear the save once the level resolves
            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                match current_phase {
                    GamePhase::Paused => Snapshot::capture(&self.state).save(),
                    GamePhase::Complete | GamePhase::GameOver => Snapshot::clear(),
                    GamePhase::Playing => {}
                }
                self.last_phase = current_phase;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref renderer) = self.renderer {
                renderer.render(&self.state, &self.settings);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.level.to_string()));
            }

            if self.settings.show_fps {
                if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            // Rule-specific meters
            if let Some(el) = document.query_selector("#hud-timer .hud-value").ok().flatten() {
                let text = match &self.state.progress {
                    WinProgress::PortalExit { global_timer, .. } => {
                        format!("{:.0}", global_timer.max(0.0))
                    }
                    WinProgress::PoweredCharge { remaining, .. } => {
                        format!("{:.0} / {:.0}", remaining[0].max(0.0), remaining[1].max(0.0))
                    }
                    WinProgress::BoxGate { .. } => format!("{:.0}", self.state.time),
                };
                el.set_text_content(Some(&text));
            }

            if self.settings.show_meters {
                for (id, player) in ["#hud-oxygen-blue", "#hud-oxygen-red"]
                    .iter()
                    .zip(&self.state.players)
                {
                    if let Some(el) = document.query_selector(id).ok().flatten() {
                        el.set_text_content(Some(&format!("{:.0}", player.oxygen.max(0.0))));
                    }
                }
            }

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                if self.state.phase == GamePhase::Paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Swap in a freshly generated level
        fn start_level(&mut self, level: u32, seed: u64) {
            if let Some(state) = levels::load(level, seed) {
                self.state = state;
                self.accumulator = 0.0;
                self.keyboard.clear();
                self.last_phase = GamePhase::Playing;
                log::info!("Started level {} with seed {}", level, seed);
            } else {
                log::error!("Unknown level {}", level);
            }
        }

        /// Resume from a saved snapshot
        fn load_state(&mut self, state: LevelState) {
            log::info!("Loaded saved game at level {}", state.level);
            self.state = state;
            self.accumulator = 0.0;
            self.keyboard.clear();
            self.last_phase = self.state.phase;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Polarity Twins starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(1, seed)));
        log::info!("Game initialized with seed: {}", seed);

        match Renderer::new(&canvas) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Failed to create renderer: {:?}", e),
        }

        // Offer to continue a saved run
        let saved = Snapshot::load().and_then(Snapshot::into_state);
        if let Some(ref save) = saved {
            if let Some(el) = document.get_element_by_id("continue-prompt") {
                let _ = el.set_attribute("class", "");
            }
            if let Some(el) = document.get_element_by_id("continue-level") {
                el.set_text_content(Some(&save.level.to_string()));
            }
            log::info!("Found saved game at level {}", save.level);
        }

        setup_input_handlers(game.clone());
        setup_resize(game.clone(), canvas.clone());
        setup_level_buttons(game.clone());
        setup_settings_toggles(game.clone());
        setup_continue_prompt(game.clone(), saved);
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Polarity Twins running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keyboard.key_down(&event.key());
                // Keep arrows and space from scrolling the page
                if event.key().starts_with("Arrow") || event.key() == " " {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keyboard.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().unwrap();

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(renderer) = game.borrow_mut().renderer.as_mut() {
                renderer.resize(width, height);
            }
            log::debug!("Canvas resized to {}x{}", width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_level_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for level in 1..=3u32 {
            if let Some(btn) = document.get_element_by_id(&format!("level-{}-btn", level)) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let seed = js_sys::Date::now() as u64;
                    game.borrow_mut().start_level(level, seed);
                    Snapshot::clear();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let level = game.borrow().state.level;
                game.borrow_mut().start_level(level, seed);
                Snapshot::clear();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_settings_toggles(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        let toggles: [(&str, fn(&mut Settings)); 4] = [
            ("toggle-fps-btn", |s| s.show_fps = !s.show_fps),
            ("toggle-meters-btn", |s| s.show_meters = !s.show_meters),
            ("toggle-motion-btn", |s| s.reduced_motion = !s.reduced_motion),
            ("toggle-contrast-btn", |s| s.high_contrast = !s.high_contrast),
        ];

        for (id, flip) in toggles {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut g = game.borrow_mut();
                    flip(&mut g.settings);
                    g.settings.save();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_continue_prompt(game: Rc<RefCell<Game>>, saved: Option<LevelState>) {
        let document = web_sys::window().unwrap().document().unwrap();

        fn hide_prompt() {
            let document = web_sys::window().unwrap().document().unwrap();
            if let Some(el) = document.get_element_by_id("continue-prompt") {
                let _ = el.set_attribute("class", "hidden");
            }
        }

        if let Some(btn) = document.get_element_by_id("continue-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Some(ref state) = saved {
                    game.borrow_mut().load_state(state.clone());
                }
                hide_prompt();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("new-game-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                Snapshot::clear();
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().start_level(1, seed);
                hide_prompt();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.state.phase = GamePhase::Paused;
                        g.keyboard.clear();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.state.phase = GamePhase::Paused;
                    g.keyboard.clear();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use polarity_twins::consts::SIM_DT;
    use polarity_twins::sim::{levels, tick, GamePhase, TickInput};

    env_logger::init();
    log::info!("Polarity Twins (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Smoke-run each level for ten simulated seconds
    for level in 1..=3 {
        let mut state = levels::load(level, 42).expect("level exists");
        let input = TickInput::default();
        for _ in 0..1200 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        log::info!(
            "level {} idle for {:.0}s: both players at rest ({}, {})",
            level,
            state.time,
            state.players[0].body.pos,
            state.players[1].body.pos
        );
    }
    println!("✓ Headless smoke run passed");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
