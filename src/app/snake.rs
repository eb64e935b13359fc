//! Snake controller
//!
//! Phases: `Menu -> Countdown -> Playing <-> Paused -> GameOver -> Menu`.
//! The frame callback feeds elapsed time into the countdown, the step timer
//! or the game-over flash depending on the phase.

use crate::consts::*;
use crate::highscores::ScoreBridge;
use crate::input::{InputEvent, InputQueue, Key};
use crate::sim::clock::{FrameClock, IntervalTimer};
use crate::sim::snake::{SnakeDifficulty, SnakeState, StepOutcome, step};

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnakePhase {
    Menu,
    /// Counting down before the first step
    Countdown { remaining: u32, elapsed_ms: f64 },
    Playing,
    Paused,
    /// Collision happened `elapsed_ms` ago
    GameOver { elapsed_ms: f64 },
}

/// Owns one Snake session
pub struct SnakeApp<B: ScoreBridge> {
    phase: SnakePhase,
    difficulty: SnakeDifficulty,
    state: SnakeState,
    clock: FrameClock,
    timer: IntervalTimer,
    queue: InputQueue,
    scores: B,
    pending_score: Option<u64>,
    outcomes: Vec<StepOutcome>,
}

impl<B: ScoreBridge> SnakeApp<B> {
    pub fn new(scores: B) -> Self {
        let difficulty = SnakeDifficulty::default();
        Self {
            phase: SnakePhase::Menu,
            difficulty,
            state: SnakeState::new(0),
            clock: FrameClock::new(SNAKE_MAX_FRAME_STEP),
            timer: IntervalTimer::new(difficulty.interval_ms()),
            queue: InputQueue::new(),
            scores,
            pending_score: None,
            outcomes: Vec::new(),
        }
    }

    pub fn phase(&self) -> SnakePhase {
        self.phase
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    pub fn scores(&self) -> &B {
        &self.scores
    }

    pub fn difficulty(&self) -> SnakeDifficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: SnakeDifficulty) {
        self.difficulty = difficulty;
    }

    /// Begin the countdown for a new game
    pub fn start(&mut self, seed: u64) {
        self.state = SnakeState::new(seed);
        self.pending_score = None;
        self.queue.clear();
        self.timer.disarm();
        self.clock.reset();
        self.phase = SnakePhase::Countdown {
            remaining: SNAKE_COUNTDOWN_STEPS,
            elapsed_ms: 0.0,
        };
    }

    /// Number shown during the countdown
    pub fn countdown(&self) -> Option<u32> {
        match self.phase {
            SnakePhase::Countdown { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            SnakePhase::Playing => {
                self.timer.disarm();
                self.phase = SnakePhase::Paused;
            }
            SnakePhase::Paused => {
                // Interval restarts from zero on resume
                self.timer.arm();
                self.clock.reset();
                self.phase = SnakePhase::Playing;
            }
            _ => {}
        }
    }

    /// Pause if playing (tab hidden, window blur)
    pub fn pause(&mut self) {
        if self.phase == SnakePhase::Playing {
            self.toggle_pause();
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Run one animation frame at clock reading `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        self.drain_input();
        let dt_ms = f64::from(self.clock.advance(now_ms)) * 1000.0;

        match self.phase {
            SnakePhase::Menu | SnakePhase::Paused => {}
            SnakePhase::Countdown {
                remaining,
                elapsed_ms,
            } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                if elapsed_ms < SNAKE_COUNTDOWN_STEP_MS {
                    self.phase = SnakePhase::Countdown {
                        remaining,
                        elapsed_ms,
                    };
                } else if remaining > 1 {
                    self.phase = SnakePhase::Countdown {
                        remaining: remaining - 1,
                        elapsed_ms: elapsed_ms - SNAKE_COUNTDOWN_STEP_MS,
                    };
                } else {
                    self.begin_play();
                }
            }
            SnakePhase::Playing => {
                if self.timer.advance(dt_ms) {
                    self.step();
                }
            }
            SnakePhase::GameOver { elapsed_ms } => {
                self.phase = SnakePhase::GameOver {
                    elapsed_ms: elapsed_ms + dt_ms,
                };
            }
        }
    }

    fn begin_play(&mut self) {
        self.timer.set_period(self.difficulty.interval_ms());
        self.timer.arm();
        self.phase = SnakePhase::Playing;
        log::info!(
            "Snake running ({}, {}ms)",
            self.difficulty.as_str(),
            self.difficulty.interval_ms()
        );
    }

    fn step(&mut self) {
        let outcome = step(&mut self.state);
        self.outcomes.push(outcome);
        if outcome.is_terminal() {
            self.timer.disarm();
            self.pending_score = Some(u64::from(self.state.score));
            self.phase = SnakePhase::GameOver { elapsed_ms: 0.0 };
        }
    }

    /// Canvas visibility during the game-over flash
    pub fn flash_visible(&self) -> bool {
        match self.phase {
            SnakePhase::GameOver { elapsed_ms } => {
                let toggles = (elapsed_ms / SNAKE_FLASH_INTERVAL_MS) as u32;
                toggles >= SNAKE_FLASH_TOGGLES || toggles % 2 == 0
            }
            _ => true,
        }
    }

    /// True once the flash has played and the prompt delay has passed
    pub fn awaiting_initials(&self) -> bool {
        matches!(self.phase, SnakePhase::GameOver { elapsed_ms } if elapsed_ms >= SNAKE_PROMPT_DELAY_MS)
            && self.pending_score.is_some()
    }

    /// Record the finished game and return to the menu
    pub fn submit_initials(&mut self, initials: &str) -> Option<usize> {
        if !matches!(self.phase, SnakePhase::GameOver { .. }) {
            return None;
        }
        let score = self.pending_score.take()?;
        self.phase = SnakePhase::Menu;
        self.scores.record(initials, score)
    }

    /// Step outcomes since the last call
    pub fn take_outcomes(&mut self) -> Vec<StepOutcome> {
        std::mem::take(&mut self.outcomes)
    }

    fn drain_input(&mut self) {
        let events: Vec<InputEvent> = self.queue.drain().collect();
        for event in events {
            let running = self.phase == SnakePhase::Playing;
            match event {
                InputEvent::KeyDown { key: Key::P, .. } | InputEvent::TogglePause => {
                    self.toggle_pause();
                }
                InputEvent::KeyDown { key, .. } => {
                    if let (true, Some(dir)) = (running, key.direction()) {
                        self.state.steer(dir);
                    }
                }
                InputEvent::Steer(dir) if running => {
                    self.state.steer(dir);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::PersistentScores;
    use crate::persistence::MemoryStore;
    use crate::sim::snake::{Cell, Direction};

    fn app() -> SnakeApp<PersistentScores<MemoryStore>> {
        SnakeApp::new(PersistentScores::load(MemoryStore::new(), "snake"))
    }

    /// Feed frames every 50ms from `from` up to `to`
    fn run(app: &mut SnakeApp<PersistentScores<MemoryStore>>, from: f64, to: f64) {
        let mut t = from;
        while t <= to {
            app.frame(t);
            t += 50.0;
        }
    }

    #[test]
    fn test_countdown_then_play() {
        let mut app = app();
        app.start(3);
        app.frame(0.0);
        assert_eq!(app.countdown(), Some(3));
        run(&mut app, 50.0, 1_000.0);
        assert_eq!(app.countdown(), Some(2));
        run(&mut app, 1_050.0, 2_000.0);
        assert_eq!(app.countdown(), Some(1));
        run(&mut app, 2_050.0, 3_000.0);
        assert_eq!(app.phase(), SnakePhase::Playing);
        assert_eq!(app.state().head(), Cell::new(9, 10), "no step during countdown");
    }

    #[test]
    fn test_steps_at_interval() {
        let mut app = app();
        app.start(3);
        run(&mut app, 0.0, 3_000.0);
        assert_eq!(app.phase(), SnakePhase::Playing);
        app.state.food = Some(Cell::new(1, 1));

        // Normal: one step per 100ms
        run(&mut app, 3_050.0, 3_300.0);
        assert_eq!(app.state().head(), Cell::new(12, 10));
    }

    #[test]
    fn test_arrow_steers() {
        let mut app = app();
        app.start(3);
        run(&mut app, 0.0, 3_000.0);
        app.state.food = Some(Cell::new(1, 1));
        app.push_input(InputEvent::KeyDown {
            key: Key::ArrowDown,
            repeat: false,
        });
        run(&mut app, 3_050.0, 3_100.0);
        assert_eq!(app.state().heading, Direction::Down);
        assert_eq!(app.state().head(), Cell::new(9, 11));
    }

    #[test]
    fn test_pause_stops_steps() {
        let mut app = app();
        app.start(3);
        run(&mut app, 0.0, 3_000.0);
        app.state.food = Some(Cell::new(1, 1));
        app.push_input(InputEvent::KeyDown {
            key: Key::P,
            repeat: false,
        });
        run(&mut app, 3_050.0, 5_000.0);
        assert_eq!(app.phase(), SnakePhase::Paused);
        assert_eq!(app.state().head(), Cell::new(9, 10));

        // Steering is ignored while paused
        app.push_input(InputEvent::Steer(Direction::Up));
        app.frame(5_050.0);
        assert_eq!(app.state().pending, Direction::Right);
    }

    #[test]
    fn test_game_over_flash_and_prompt() {
        let mut app = app();
        app.start(3);
        run(&mut app, 0.0, 3_000.0);
        app.state.food = Some(Cell::new(1, 1));
        app.state.score = 7;
        app.state.body.clear();
        app.state.body.push_back(Cell::new(19, 10));

        run(&mut app, 3_050.0, 3_100.0);
        assert!(matches!(app.phase(), SnakePhase::GameOver { .. }));
        assert!(app.flash_visible());
        assert!(!app.awaiting_initials());

        app.frame(3_250.0);
        assert!(!app.flash_visible(), "first toggle hides the canvas");
        run(&mut app, 3_300.0, 3_900.0);
        assert!(app.flash_visible());
        assert!(app.awaiting_initials());

        assert_eq!(app.submit_initials("  ace"), Some(1));
        assert_eq!(app.phase(), SnakePhase::Menu);
        assert_eq!(app.scores().best(), 7);
        assert!(app.take_outcomes().iter().any(|o| o.is_terminal()));
    }

    #[test]
    fn test_skip_initials_keeps_table_empty() {
        let mut app = app();
        app.start(3);
        run(&mut app, 0.0, 3_000.0);
        app.state.body.clear();
        app.state.body.push_back(Cell::new(19, 10));
        app.state.food = Some(Cell::new(1, 1));
        run(&mut app, 3_050.0, 4_000.0);

        assert_eq!(app.submit_initials(""), None);
        assert!(app.scores().table().is_empty());
        assert_eq!(app.phase(), SnakePhase::Menu);
    }
}
