//! Breakout controller: screens, input routing and score bookkeeping

use glam::Vec2;

use crate::consts::MAX_FRAME_STEP;
use crate::highscores::ScoreBridge;
use crate::input::{InputEvent, InputQueue, Key, PaddleControls, Side};
use crate::settings::Settings;
use crate::sim::breakout::{BreakoutState, Difficulty, GameEvent, Mode, TickInput, tick};
use crate::sim::clock::FrameClock;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::Playing => "playing",
            Screen::Paused => "paused",
            Screen::GameOver => "gameover",
        }
    }
}

/// Owns one Breakout session and everything around it
pub struct BreakoutApp<B: ScoreBridge> {
    screen: Screen,
    mode: Mode,
    difficulty: Difficulty,
    viewport: Vec2,
    state: BreakoutState,
    clock: FrameClock,
    queue: InputQueue,
    controls: PaddleControls,
    settings: Settings,
    scores: B,
    /// Final score waiting for initials
    pending_score: Option<u64>,
    events: Vec<GameEvent>,
}

impl<B: ScoreBridge> BreakoutApp<B> {
    pub fn new(viewport: Vec2, settings: Settings, scores: B) -> Self {
        let mode = Mode::default();
        let difficulty = Difficulty::default();
        Self {
            screen: Screen::Menu,
            mode,
            difficulty,
            viewport,
            state: BreakoutState::new(viewport, mode, difficulty, 0),
            clock: FrameClock::new(MAX_FRAME_STEP),
            queue: InputQueue::new(),
            controls: PaddleControls::default(),
            settings,
            scores,
            pending_score: None,
            events: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn state(&self) -> &BreakoutState {
        &self.state
    }

    pub fn scores(&self) -> &B {
        &self.scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Pick the mode and difficulty for the next game
    pub fn select(&mut self, mode: Mode, difficulty: Difficulty) {
        self.mode = mode;
        self.difficulty = difficulty;
    }

    /// Start a fresh game
    pub fn start(&mut self, seed: u64) {
        self.state = BreakoutState::new(self.viewport, self.mode, self.difficulty, seed);
        self.screen = Screen::Playing;
        self.pending_score = None;
        self.queue.clear();
        self.controls.release();
        self.clock.reset();
    }

    pub fn pause(&mut self) {
        if self.screen == Screen::Playing {
            self.screen = Screen::Paused;
            self.controls.release();
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.screen == Screen::Paused {
            self.screen = Screen::Playing;
            self.clock.reset();
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.screen {
            Screen::Playing => self.pause(),
            Screen::Paused => self.resume(),
            _ => {}
        }
    }

    /// Abandon the current game
    pub fn to_menu(&mut self) {
        self.screen = Screen::Menu;
        self.pending_score = None;
        self.controls.release();
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.state.resize(viewport);
    }

    /// Queue an input event for the next frame
    pub fn push_input(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Run one animation frame at clock reading `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        let input = self.drain_input();

        if self.screen != Screen::Playing {
            self.clock.reset();
            return;
        }

        let dt = self.clock.advance(now_ms);
        tick(&mut self.state, &input, dt, now_ms);

        if self.state.game_over {
            self.screen = Screen::GameOver;
            self.pending_score = Some(self.state.score);
            self.controls.release();
        }
        self.events.append(&mut self.state.events);
    }

    /// True while the game-over screen waits for initials
    pub fn awaiting_initials(&self) -> bool {
        self.screen == Screen::GameOver && self.pending_score.is_some()
    }

    /// Record the finished game. Empty initials keep it off the table.
    pub fn submit_initials(&mut self, initials: &str) -> Option<usize> {
        let score = self.pending_score.take()?;
        self.scores.record(initials, score)
    }

    /// Events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fold queued events into held controls and a tick snapshot
    fn drain_input(&mut self) -> TickInput {
        let mut input = TickInput::default();
        let events: Vec<InputEvent> = self.queue.drain().collect();

        for event in events {
            let playing = self.screen == Screen::Playing;
            match event {
                InputEvent::KeyDown { key: Key::P, .. } | InputEvent::TogglePause => {
                    self.toggle_pause();
                }
                InputEvent::KeyDown { key: Key::F, repeat } => {
                    if playing && !repeat {
                        input.fire = true;
                    }
                }
                InputEvent::KeyDown { key: Key::Space, repeat } => {
                    if playing && !repeat {
                        input.launch = true;
                    }
                }
                InputEvent::KeyDown { key, .. } => self.set_key(key, true),
                InputEvent::KeyUp { key } => self.set_key(key, false),
                InputEvent::PointerDown { x } => {
                    if !playing {
                        continue;
                    }
                    let paddle = &self.state.paddle;
                    if paddle.rect().spans_x(x) {
                        self.controls.drag_offset = Some(x - paddle.pos.x);
                    } else {
                        input.launch = true;
                    }
                }
                InputEvent::PointerMove { x } => {
                    if let (true, Some(offset)) = (playing, self.controls.drag_offset) {
                        input.drag_x = Some(x - offset);
                    }
                }
                InputEvent::PointerUp => self.controls.drag_offset = None,
                InputEvent::TouchHold { side, held } => match side {
                    Side::Left => self.controls.touch_left = held,
                    Side::Right => self.controls.touch_right = held,
                },
                InputEvent::Steer(_) => {}
            }
        }

        input.left = self.controls.left();
        input.right = self.controls.right();
        input
    }

    fn set_key(&mut self, key: Key, down: bool) {
        let keys = self.settings.desktop_keys;
        match key {
            Key::A if keys.letters() => self.controls.key_left = down,
            Key::D if keys.letters() => self.controls.key_right = down,
            Key::ArrowLeft if keys.arrows() => self.controls.key_left = down,
            Key::ArrowRight if keys.arrows() => self.controls.key_right = down,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_RADIUS;
    use crate::highscores::PersistentScores;
    use crate::persistence::MemoryStore;
    use crate::settings::DesktopKeyMode;
    use crate::sim::breakout::state::Ball;

    fn app() -> BreakoutApp<PersistentScores<MemoryStore>> {
        BreakoutApp::new(
            Vec2::new(800.0, 600.0),
            Settings::default(),
            PersistentScores::load(MemoryStore::new(), "breakout"),
        )
    }

    fn key_down(key: Key) -> InputEvent {
        InputEvent::KeyDown { key, repeat: false }
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut app = app();
        app.push_input(key_down(Key::D));
        app.frame(0.0);
        app.frame(16.0);
        assert_eq!(app.screen(), Screen::Menu);
        assert_eq!(app.state().paddle.pos.x, 330.0);
    }

    #[test]
    fn test_held_key_moves_paddle() {
        let mut app = app();
        app.start(1);
        app.push_input(key_down(Key::D));
        app.frame(0.0);
        app.frame(20.0);
        assert!(app.state().paddle.pos.x > 330.0);

        app.push_input(InputEvent::KeyUp { key: Key::D });
        app.frame(40.0);
        let x = app.state().paddle.pos.x;
        app.frame(60.0);
        assert_eq!(app.state().paddle.pos.x, x);
    }

    #[test]
    fn test_arrows_ignored_in_letter_mode() {
        let mut app = app();
        app.start(1);
        app.push_input(key_down(Key::ArrowRight));
        app.frame(0.0);
        app.frame(20.0);
        assert_eq!(app.state().paddle.pos.x, 330.0);

        app.settings_mut().desktop_keys = DesktopKeyMode::Both;
        app.push_input(key_down(Key::ArrowRight));
        app.frame(40.0);
        assert!(app.state().paddle.pos.x > 330.0);
    }

    #[test]
    fn test_space_launches_once() {
        let mut app = app();
        app.start(1);
        app.push_input(InputEvent::KeyDown {
            key: Key::Space,
            repeat: true,
        });
        app.frame(0.0);
        assert!(app.state().is_serving());

        app.push_input(key_down(Key::Space));
        app.frame(16.0);
        assert!(!app.state().is_serving());
        assert!(app.take_events().contains(&GameEvent::BallLaunched));
    }

    #[test]
    fn test_tap_outside_paddle_launches() {
        let mut app = app();
        app.start(1);
        app.push_input(InputEvent::PointerDown { x: 50.0 });
        app.frame(0.0);
        assert!(!app.state().is_serving());
    }

    #[test]
    fn test_drag_moves_paddle() {
        let mut app = app();
        app.start(1);
        // Grab the paddle 20px from its left edge
        app.push_input(InputEvent::PointerDown { x: 350.0 });
        app.push_input(InputEvent::PointerMove { x: 520.0 });
        app.frame(0.0);
        assert!(app.state().is_serving());
        assert_eq!(app.state().paddle.pos.x, 500.0);

        app.push_input(InputEvent::PointerUp);
        app.push_input(InputEvent::PointerMove { x: 100.0 });
        app.frame(16.0);
        assert_eq!(app.state().paddle.pos.x, 500.0);
    }

    #[test]
    fn test_pause_freezes_and_resume_resets_clock() {
        let mut app = app();
        app.start(1);
        app.push_input(key_down(Key::Space));
        app.frame(0.0);
        app.frame(16.0);
        let y = app.state().balls[0].pos.y;

        app.push_input(key_down(Key::P));
        app.frame(32.0);
        assert_eq!(app.screen(), Screen::Paused);
        app.frame(5_000.0);
        assert_eq!(app.state().balls[0].pos.y, y);

        app.push_input(InputEvent::TogglePause);
        app.frame(10_000.0);
        assert_eq!(app.screen(), Screen::Playing);
        // First frame after resume has dt = 0
        assert_eq!(app.state().balls[0].pos.y, y);
    }

    #[test]
    fn test_game_over_records_score() {
        let mut app = app();
        app.start(1);
        app.state.lives = 1;
        app.state.score = 420;
        app.state.balls = vec![Ball {
            pos: Vec2::new(400.0, 640.0),
            vel: Vec2::new(0.0, 300.0),
            radius: BALL_RADIUS,
            stuck_to_paddle: false,
        }];
        app.frame(0.0);
        app.frame(16.0);

        assert_eq!(app.screen(), Screen::GameOver);
        assert!(app.awaiting_initials());
        assert!(app.take_events().contains(&GameEvent::GameOver { score: 420 }));

        assert_eq!(app.submit_initials("kim"), Some(1));
        assert!(!app.awaiting_initials());
        assert_eq!(app.scores().best(), 420);
        assert_eq!(app.scores().table().entries[0].initials, "KIM");
        // Only once
        assert_eq!(app.submit_initials("kim"), None);
    }

    #[test]
    fn test_touch_hold_moves_paddle() {
        let mut app = app();
        app.start(1);
        app.push_input(InputEvent::TouchHold {
            side: Side::Left,
            held: true,
        });
        app.frame(0.0);
        app.frame(20.0);
        assert!(app.state().paddle.pos.x < 330.0);
    }
}
