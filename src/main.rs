//! Cosmic Cleaner entry point
//!
//! Handles platform-specific initialization and runs the game loop. All of
//! the DOM/HUD glue lives here; the simulation itself is in the library.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, TouchEvent,
    };

    use cosmic_cleaner::consts::*;
    use cosmic_cleaner::render::render;
    use cosmic_cleaner::sim::{TickInput, VirtualJoystick};
    use cosmic_cleaner::{Phase, SessionController, Settings};
    use glam::Vec2;

    /// Game instance holding all state
    struct Game {
        session: SessionController,
        joystick: VirtualJoystick,
        settings: Settings,
        boost_held: bool,
        magnet_pending: bool,
        shield_pending: bool,
        last_time: f64,
        last_phase: Phase,
    }

    impl Game {
        fn new(seed: u64, bounds: Vec2, joystick_base: Vec2) -> Self {
            Self {
                session: SessionController::new(seed, bounds),
                joystick: VirtualJoystick::new(joystick_base),
                settings: Settings::load(),
                boost_held: false,
                magnet_pending: false,
                shield_pending: false,
                last_time: 0.0,
                last_phase: Phase::Idle,
            }
        }

        /// Run the drivers for one frame
        fn update(&mut self, dt: f32) {
            let input = TickInput {
                direction: self.joystick.vector(),
                boost: self.boost_held,
                magnet: self.magnet_pending,
                shield: self.shield_pending,
            };
            let fired = self.session.advance(dt, &input);
            if fired > 0 {
                // One-shot commands were consumed by the sim
                self.magnet_pending = false;
                self.shield_pending = false;
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cosmic Cleaner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Missing rendering surface is fatal at startup
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("canvas #gameCanvas not found")
            .dyn_into()
            .expect("#gameCanvas is not a canvas element");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("failed to query 2d context")
            .expect("2d context unavailable")
            .dyn_into()
            .expect("unexpected context type");

        let bounds = size_canvas(&document, &canvas);

        let seed = js_sys::Date::now() as u64;
        let joystick_base = joystick_base_center(&document);
        let game = Rc::new(RefCell::new(Game::new(seed, bounds, joystick_base)));

        log::info!("initialized with seed {seed}, field {}x{}", bounds.x, bounds.y);

        setup_menu_buttons(&document, &canvas, game.clone());
        setup_game_buttons(&document, &canvas, game.clone());
        setup_joystick(&document, game.clone());
        setup_resize(&document, &canvas, game.clone());

        refresh_menu_stats(&document, &game.borrow());
        show_screen(&document, "mainMenu");

        request_animation_frame(game, ctx);

        log::info!("Cosmic Cleaner running!");
    }

    /// Size the canvas to the game area, with a sane minimum
    fn size_canvas(document: &Document, canvas: &HtmlCanvasElement) -> Vec2 {
        let (w, h) = document
            .query_selector(".game-area")
            .ok()
            .flatten()
            .map(|area| (area.client_width(), area.client_height()))
            .unwrap_or((0, 0));
        let width = (w as f32).max(MIN_FIELD_WIDTH);
        let height = (h as f32).max(MIN_FIELD_HEIGHT);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        Vec2::new(width, height)
    }

    /// Center of the joystick base element in client coordinates
    fn joystick_base_center(document: &Document) -> Vec2 {
        document
            .get_element_by_id("joystickBase")
            .map(|base| {
                let rect = base.get_bounding_client_rect();
                Vec2::new(
                    (rect.left() + rect.width() / 2.0) as f32,
                    (rect.top() + rect.height() / 2.0) as f32,
                )
            })
            .unwrap_or(Vec2::ZERO)
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ctx: CanvasRenderingContext2d) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, ctx, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ctx: CanvasRenderingContext2d, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                (((time - g.last_time) / 1000.0) as f32).min(0.1)
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);

            let document = web_sys::window().unwrap().document().unwrap();
            sync_phase_screens(&document, &mut g);
            if g.session.phase() != Phase::Idle {
                render(&ctx, &g.session.world);
            }
            update_hud(&document, &g);
        }

        request_animation_frame(game, ctx);
    }

    /// Switch DOM screens when the session phase changes
    fn sync_phase_screens(document: &Document, g: &mut Game) {
        let phase = g.session.phase();
        if phase == g.last_phase {
            return;
        }
        g.last_phase = phase;

        match phase {
            Phase::Idle => {
                refresh_menu_stats(document, g);
                show_screen(document, "mainMenu");
            }
            Phase::Running => show_screen(document, "gameScreen"),
            Phase::Paused => show_screen(document, "pauseScreen"),
            Phase::Lost => {
                set_text(document, "finalScore", &g.session.world.score.to_string());
                set_text(
                    document,
                    "finalBestScore",
                    &g.session.stats().best_score.to_string(),
                );
                show_screen(document, "gameOverScreen");
            }
            Phase::Won => {
                let world = &g.session.world;
                set_text(document, "victoryScore", &world.score.to_string());
                set_text(
                    document,
                    "victoryHealth",
                    &format!("{}%", world.health.max(0.0).round() as u32),
                );
                set_text(
                    document,
                    "victoryTime",
                    &format!("{}s", world.elapsed().round() as u32),
                );
                show_screen(document, "victoryScreen");
            }
        }
    }

    /// Per-frame HUD refresh from the snapshot
    fn update_hud(document: &Document, g: &Game) {
        if g.session.phase() != Phase::Running {
            return;
        }
        let snap = g.session.snapshot();

        set_text(document, "score", &format!("{}/{}", snap.score, snap.target));
        set_text(document, "time", &format!("{}s", snap.time_left));

        let health = snap.health.round() as u32;
        set_text(document, "health", &format!("{health}%"));
        if let Some(el) = document.get_element_by_id("health") {
            let color = if snap.health > 70.0 {
                "#00ff88"
            } else if snap.health > 30.0 {
                "#ffaa00"
            } else {
                "#ff3366"
            };
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let _ = el.style().set_property("color", color);
            }
        }

        if let Some(el) = document.get_element_by_id("powerFill") {
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let _ = el
                    .style()
                    .set_property("width", &format!("{}%", snap.power_frac * 100.0));
            }
        }

        // Keep the joystick knob under the player's finger
        if let Some(el) = document.get_element_by_id("joystick") {
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let offset = g.joystick.knob_offset();
                let _ = el.style().set_property(
                    "transform",
                    &format!(
                        "translate(calc(-50% + {}px), calc(-50% + {}px))",
                        offset.x, offset.y
                    ),
                );
            }
        }
    }

    fn refresh_menu_stats(document: &Document, g: &Game) {
        let stats = g.session.stats();
        set_text(document, "bestScoreDisplay", &stats.best_score.to_string());
        set_text(
            document,
            "totalCleanedDisplay",
            &stats.total_cleaned.to_string(),
        );
    }

    fn setup_menu_buttons(document: &Document, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Start/restart entry points all funnel through the same handler
        for id in [
            "startGame",
            "startTutorialGame",
            "restartGame",
            "restartAfterGameOver",
            "nextLevel",
        ] {
            let game = game.clone();
            let canvas = canvas.clone();
            on_click(document, id, move || {
                let document = web_sys::window().unwrap().document().unwrap();
                let bounds = size_canvas(&document, &canvas);
                let mut g = game.borrow_mut();
                g.joystick.rebase(joystick_base_center(&document));
                g.boost_held = false;
                g.magnet_pending = false;
                g.shield_pending = false;
                g.session.start_session(bounds);
            });
        }

        for id in ["quitToMenu", "menuAfterGameOver", "menuAfterVictory"] {
            let game = game.clone();
            on_click(document, id, move || {
                game.borrow_mut().session.quit_to_menu();
            });
        }

        {
            let game = game.clone();
            on_click(document, "toggleSound", move || {
                let mut g = game.borrow_mut();
                g.settings.toggle_sound();
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(icon) = document
                    .query_selector("#toggleSound i")
                    .ok()
                    .flatten()
                {
                    let class = if g.settings.sound_enabled {
                        "fas fa-volume-up"
                    } else {
                        "fas fa-volume-mute"
                    };
                    let _ = icon.set_attribute("class", class);
                }
            });
        }

        on_click(document, "howToPlay", || {
            let document = web_sys::window().unwrap().document().unwrap();
            show_screen(&document, "tutorialScreen");
        });
        on_click(document, "backFromTutorial", || {
            let document = web_sys::window().unwrap().document().unwrap();
            show_screen(&document, "mainMenu");
        });
        on_click(document, "highScoresBtn", || {
            let document = web_sys::window().unwrap().document().unwrap();
            show_screen(&document, "highScoresScreen");
        });
        on_click(document, "backFromScores", || {
            let document = web_sys::window().unwrap().document().unwrap();
            show_screen(&document, "mainMenu");
        });
    }

    fn setup_game_buttons(document: &Document, _canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Boost is held, not toggled
        if let Some(btn) = document.get_element_by_id("boostBtn") {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                g.borrow_mut().boost_held = true;
            });
            let _ = btn
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();

            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                g.borrow_mut().boost_held = false;
            });
            let _ =
                btn.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            on_click(document, "magnetBtn", move || {
                game.borrow_mut().magnet_pending = true;
            });
        }
        {
            let game = game.clone();
            on_click(document, "shieldBtn", move || {
                game.borrow_mut().shield_pending = true;
            });
        }
        for id in ["pauseBtn", "resumeGame"] {
            let game = game.clone();
            on_click(document, id, move || {
                game.borrow_mut().session.toggle_pause();
            });
        }
    }

    fn setup_joystick(document: &Document, game: Rc<RefCell<Game>>) {
        // Touch starts on the base; moves and ends are tracked document-wide
        // so the finger can wander off the base without dropping input.
        if let Some(base) = document.get_element_by_id("joystickBase") {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut game = g.borrow_mut();
                let document = web_sys::window().unwrap().document().unwrap();
                game.joystick.rebase(joystick_base_center(&document));
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        game.joystick.contact_down(
                            touch.identifier(),
                            Vec2::new(touch.client_x() as f32, touch.client_y() as f32),
                        );
                    }
                }
            });
            let _ = base
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut game = g.borrow_mut();
                if !game.joystick.is_active() {
                    return;
                }
                event.prevent_default();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        game.joystick.contact_move(
                            touch.identifier(),
                            Vec2::new(touch.client_x() as f32, touch.client_y() as f32),
                        );
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for event_name in ["touchend", "touchcancel"] {
            let g = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut game = g.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        game.joystick.contact_up(touch.identifier());
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(document: &Document, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let bounds = size_canvas(&document, &canvas);
            let mut g = game.borrow_mut();
            g.session.resize(bounds);
            g.joystick.rebase(joystick_base_center(&document));
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Show one `.screen` element and hide the rest
    fn show_screen(document: &Document, id: &str) {
        if let Ok(screens) = document.query_selector_all(".screen") {
            for i in 0..screens.length() {
                if let Some(screen) = screens.get(i) {
                    if let Ok(el) = screen.dyn_into::<Element>() {
                        el.class_list().remove_1("active").ok();
                    }
                }
            }
        }
        if let Some(el) = document.get_element_by_id(id) {
            el.class_list().add_1("active").ok();
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn on_click(document: &Document, id: &str, mut f: impl FnMut() + 'static) {
        if let Some(el) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                f();
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cosmic_cleaner::consts::*;
    use cosmic_cleaner::sim::TickInput;
    use cosmic_cleaner::{Phase, SessionController};
    use glam::Vec2;

    env_logger::init();
    log::info!("Cosmic Cleaner (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Scripted demo session: drift right for a few simulated seconds
    let mut session = SessionController::new(0xC0FFEE, Vec2::new(400.0, 400.0));
    session.start_session(Vec2::new(400.0, 400.0));
    let input = TickInput {
        direction: Vec2::new(1.0, 0.0),
        ..Default::default()
    };
    for _ in 0..(5 * 60) {
        session.advance(SIM_DT, &input);
        if session.phase() != Phase::Running {
            break;
        }
    }
    let snap = session.snapshot();
    println!(
        "demo: phase {:?}, score {}/{}, health {:.0}%, {}s left",
        session.phase(),
        snap.score,
        snap.target,
        snap.health,
        snap.time_left
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
