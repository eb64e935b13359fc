//! Tenebris Arcade entry point
//!
//! On the web this wires the canvas, input listeners and the frame loop. The
//! native build has no UI and runs a short headless demo of both games.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use tenebris_arcade::StartupError;
    use tenebris_arcade::app::{BreakoutApp, Screen, SnakeApp, SnakePhase};
    use tenebris_arcade::audio::{AudioManager, SoundEffect};
    use tenebris_arcade::highscores::{PersistentScores, ScoreBridge};
    use tenebris_arcade::input::{InputEvent, Key};
    use tenebris_arcade::persistence::{KeyValueStore, default_store};
    use tenebris_arcade::platform::{now_ms, session_seed};
    use tenebris_arcade::renderer::{CanvasRenderer, draw_breakout, draw_snake};
    use tenebris_arcade::settings::Settings;

    const CANVAS_ID: &str = "game";

    type Scores = PersistentScores<Box<dyn KeyValueStore>>;

    enum Arcade {
        Breakout(BreakoutApp<Scores>),
        Snake(SnakeApp<Scores>),
    }

    /// Everything the page keeps alive between frames
    struct Game {
        arcade: Arcade,
        renderer: CanvasRenderer,
        audio: AudioManager,
    }

    impl Game {
        /// No game running and nothing left to record
        fn is_idle(&self) -> bool {
            match &self.arcade {
                Arcade::Breakout(app) => match app.screen() {
                    Screen::Menu => true,
                    Screen::GameOver => !app.awaiting_initials(),
                    _ => false,
                },
                Arcade::Snake(app) => app.phase() == SnakePhase::Menu,
            }
        }

        fn handle_key(&mut self, key: Key, repeat: bool) {
            if self.is_idle() && key == Key::Space && !repeat {
                self.start();
                return;
            }
            self.push_input(InputEvent::KeyDown { key, repeat });
        }

        fn push_input(&mut self, event: InputEvent) {
            match &mut self.arcade {
                Arcade::Breakout(app) => app.push_input(event),
                Arcade::Snake(app) => app.push_input(event),
            }
        }

        fn start(&mut self) {
            let seed = session_seed();
            self.audio.resume();
            match &mut self.arcade {
                Arcade::Breakout(app) => app.start(seed),
                Arcade::Snake(app) => app.start(seed),
            }
            log::info!("New game with seed: {}", seed);
        }

        fn pause(&mut self) {
            match &mut self.arcade {
                Arcade::Breakout(app) => app.pause(),
                Arcade::Snake(app) => app.pause(),
            }
        }

        fn resize(&mut self, css_size: Vec2, dpr: f64) {
            match &mut self.arcade {
                Arcade::Breakout(app) => {
                    self.renderer.resize(css_size, dpr);
                    app.resize(css_size);
                }
                Arcade::Snake(_) => {
                    // Square board: shrink the CSS box too so cells stay square
                    let side = Vec2::splat(css_size.x.min(css_size.y));
                    self.renderer.set_css_size(side);
                    self.renderer.resize(side, dpr);
                }
            }
        }

        /// Update and draw one frame; true when the initials prompt is due
        fn frame(&mut self, time: f64) -> bool {
            match &mut self.arcade {
                Arcade::Breakout(app) => {
                    app.frame(time);
                    for event in app.take_events() {
                        if let Some(effect) = SoundEffect::for_breakout(&event) {
                            self.audio.play(effect);
                        }
                    }
                    draw_breakout(&mut self.renderer, app.state(), app.screen(), time);
                    app.awaiting_initials()
                }
                Arcade::Snake(app) => {
                    app.frame(time);
                    for outcome in app.take_outcomes() {
                        if let Some(effect) = SoundEffect::for_snake(&outcome) {
                            self.audio.play(effect);
                        }
                    }
                    let size = self.renderer.size().x;
                    let best = app.scores().best();
                    draw_snake(&mut self.renderer, app.state(), best, size, app.flash_visible());
                    app.awaiting_initials()
                }
            }
        }

        fn submit_initials(&mut self, initials: &str) {
            let rank = match &mut self.arcade {
                Arcade::Breakout(app) => app.submit_initials(initials),
                Arcade::Snake(app) => app.submit_initials(initials),
            };
            if let Some(rank) = rank {
                log::info!("High score entered at rank {}", rank);
            }
        }
    }

    pub fn run() -> Result<(), StartupError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger already set: {e}").into());
        }

        log::info!("Tenebris Arcade starting...");

        let window =
            web_sys::window().ok_or_else(|| StartupError::CanvasUnavailable(CANVAS_ID.into()))?;
        let document = window
            .document()
            .ok_or_else(|| StartupError::CanvasUnavailable(CANVAS_ID.into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| StartupError::CanvasUnavailable(CANVAS_ID.into()))?
            .dyn_into()
            .map_err(|_| StartupError::CanvasUnavailable(CANVAS_ID.into()))?;

        let game_name = canvas
            .get_attribute("data-game")
            .unwrap_or_else(|| "breakout".to_string());
        let renderer = CanvasRenderer::new(canvas.clone())?;
        let css_size = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
        let dpr = window.device_pixel_ratio();

        let (arcade, sfx_volume) = if game_name == "snake" {
            let scores = PersistentScores::load(default_store(), "snake");
            (Arcade::Snake(SnakeApp::new(scores)), Settings::default().effective_sfx_volume())
        } else {
            let settings = Settings::load(&default_store());
            let sfx_volume = settings.effective_sfx_volume();
            let scores = PersistentScores::load(default_store(), "breakout");
            (
                Arcade::Breakout(BreakoutApp::new(css_size, settings, scores)),
                sfx_volume,
            )
        };

        let game = Rc::new(RefCell::new(Game {
            arcade,
            renderer,
            audio: AudioManager::new(sfx_volume),
        }));
        game.borrow_mut().resize(css_size, dpr);

        setup_keyboard(game.clone());
        setup_pointer(&canvas, game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Tenebris Arcade running ({})", game_name);
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_dom(&event.key(), &event.code());
                if key.captures_default() {
                    event.prevent_default();
                }
                game.borrow_mut().handle_key(key, event.repeat());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_dom(&event.key(), &event.code());
                game.borrow_mut().push_input(InputEvent::KeyUp { key });
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let mut g = game.borrow_mut();
                if g.is_idle() {
                    g.start();
                } else {
                    g.audio.resume();
                    g.push_input(InputEvent::PointerDown { x });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                game.borrow_mut().push_input(InputEvent::PointerMove { x });
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().push_input(InputEvent::PointerUp);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let size = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
            game.borrow_mut().resize(size, window.device_pixel_ratio());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let wants_initials = game.borrow_mut().frame(now_ms());

        if wants_initials {
            // Blocking prompt; no borrow is held across it
            let initials = web_sys::window()
                .and_then(|w| {
                    w.prompt_with_message_and_default("New score! Enter your initials:", "")
                        .ok()
                        .flatten()
                })
                .unwrap_or_default();
            game.borrow_mut().submit_initials(&initials);
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().pause();
                    log::info!("Auto-paused (tab hidden)");
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
                game.borrow_mut().pause();
                log::info!("Auto-paused (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().map_err(|e| {
        log::error!("{}", e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tenebris Arcade (native) starting...");
    log::info!("The games run in the browser; running a headless demo instead");

    demo::breakout();
    demo::snake();
}

/// Headless sessions driven by simple autopilots
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use tenebris_arcade::app::{BreakoutApp, Screen, SnakeApp, SnakePhase};
    use tenebris_arcade::highscores::{PersistentScores, ScoreBridge};
    use tenebris_arcade::input::{InputEvent, Key};
    use tenebris_arcade::persistence::MemoryStore;
    use tenebris_arcade::platform::session_seed;
    use tenebris_arcade::settings::Settings;
    use tenebris_arcade::sim::snake::Direction;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Two simulated minutes
    const BREAKOUT_FRAMES: u32 = 60 * 120;
    const SNAKE_FRAMES: u32 = 60 * 120;

    pub fn breakout() {
        let seed = session_seed();
        let mut app = BreakoutApp::new(
            Vec2::new(800.0, 600.0),
            Settings::default(),
            PersistentScores::load(MemoryStore::new(), "breakout"),
        );
        app.start(seed);

        // Grab the paddle at its center and keep it under the lowest ball
        let grab_x = app.state().paddle.center_x();
        app.push_input(InputEvent::PointerDown { x: grab_x });

        let mut now = 0.0;
        for _ in 0..BREAKOUT_FRAMES {
            if app.screen() != Screen::Playing {
                break;
            }
            let state = app.state();
            let serving = state.is_serving();
            let can_fire = state.buffs.can_fire(now);
            let target_x = state
                .balls
                .iter()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|ball| ball.pos.x);

            if serving {
                app.push_input(InputEvent::KeyDown {
                    key: Key::Space,
                    repeat: false,
                });
            } else if let Some(x) = target_x {
                app.push_input(InputEvent::PointerMove { x });
            }
            if can_fire {
                app.push_input(InputEvent::KeyDown {
                    key: Key::F,
                    repeat: false,
                });
            }
            app.frame(now);
            now += FRAME_MS;
        }

        let state = app.state();
        log::info!(
            "Breakout demo: score {} level {} lives {} ({})",
            state.score,
            state.level,
            state.lives,
            app.screen().as_str()
        );
        if app.awaiting_initials() {
            app.submit_initials("cpu");
        }
        log::info!("Breakout best: {}", app.scores().best());
    }

    pub fn snake() {
        let mut app = SnakeApp::new(PersistentScores::load(MemoryStore::new(), "snake"));
        app.start(session_seed());

        let mut now = 0.0;
        for _ in 0..SNAKE_FRAMES {
            if matches!(app.phase(), SnakePhase::GameOver { .. }) {
                break;
            }
            if let (SnakePhase::Playing, Some(food)) = (app.phase(), app.state().food) {
                let head = app.state().head();
                let dir = if food.x > head.x {
                    Direction::Right
                } else if food.x < head.x {
                    Direction::Left
                } else if food.y > head.y {
                    Direction::Down
                } else {
                    Direction::Up
                };
                app.push_input(InputEvent::Steer(dir));
            }
            app.frame(now);
            now += FRAME_MS;
        }

        log::info!(
            "Snake demo: score {} length {} ({:?})",
            app.state().score,
            app.state().len(),
            app.phase()
        );
        // Let the flash and prompt delay play out
        for _ in 0..60 {
            app.frame(now);
            now += FRAME_MS;
        }
        if app.awaiting_initials() {
            app.submit_initials("cpu");
        }
        log::info!("Snake best: {}", app.scores().best());
    }
}
