//! Tenebris Arcade - Breakout and Snake for the Tenebris Army website
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (clock, collisions, Breakout and Snake rules)
//! - `app`: Game controllers owning one session each (screens, input, scoring)
//! - `input`: Input event queue drained once per tick
//! - `highscores`: Top-5 leaderboard and best score bridge
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `settings`: Breakout user preferences
//! - `renderer`: Drawing backends consuming simulation state
//! - `audio`: Generated fallback tones

pub mod app;
pub mod audio;
pub mod error;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{StartupError, StorageError};
pub use highscores::{HighScores, PersistentScores, ScoreBridge};
pub use settings::{DesktopKeyMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single Breakout tick (seconds), guards against tab-suspend jumps
    pub const MAX_FRAME_STEP: f32 = 0.033;

    /// Side wall inset, also the paddle travel margin
    pub const WALL_INSET: f32 = 8.0;
    /// Top wall (the HUD band sits above it)
    pub const PLAYFIELD_TOP: f32 = 56.0;

    /// Paddle defaults
    pub const PADDLE_HEIGHT: f32 = 16.0;
    pub const PADDLE_SPEED: f32 = 900.0;
    /// Distance from the bottom of the viewport to the paddle top
    pub const PADDLE_FLOOR_OFFSET: f32 = 42.0;
    /// Width the WIDEN bonus is measured from (independent of difficulty)
    pub const PADDLE_REFERENCE_WIDTH: f32 = 140.0;
    pub const WIDEN_BONUS: f32 = 60.0;
    pub const PADDLE_MIN_WIDTH: f32 = 120.0;
    pub const PADDLE_MAX_WIDTH: f32 = 220.0;
    /// Exponential easing rate for paddle width (per second)
    pub const PADDLE_EASE_RATE: f32 = 8.0;
    /// Maximum deflection off the paddle (radians from vertical)
    pub const MAX_BOUNCE_ANGLE: f32 = 1.1;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 7.0;
    pub const MAX_BALLS: usize = 3;
    /// Launch angle spread (radians either side of vertical)
    pub const LAUNCH_SPREAD: f32 = 0.9;
    pub const MULTI_SPREAD: f32 = 1.0;
    /// Ball speed multiplier while SLOW is active
    pub const SLOW_FACTOR: f32 = 0.78;
    /// How far below the viewport a ball may fall before it is lost
    pub const BALL_LOSS_MARGIN: f32 = 20.0;
    /// Height above the viewport bottom a shield-saved ball restarts from
    pub const SHIELD_RESCUE_OFFSET: f32 = 80.0;

    /// Buff durations (ms)
    pub const WIDEN_DURATION_MS: f64 = 12_000.0;
    pub const SLOW_DURATION_MS: f64 = 9_000.0;
    pub const LASER_DURATION_MS: f64 = 12_000.0;
    pub const MAX_SHIELD_CHARGES: u8 = 3;

    /// Laser defaults
    pub const LASER_AMMO_PER_PICKUP: u32 = 18;
    pub const LASER_MAX_AMMO: u32 = 40;
    pub const LASER_AMMO_PER_SHOT: u32 = 2;
    pub const LASER_COOLDOWN: f32 = 0.12;
    pub const LASER_SPEED: f32 = 880.0;
    pub const LASER_EDGE_INSET: f32 = 16.0;
    /// Bolts at or above this line have left the playfield
    pub const LASER_CEILING: f32 = 40.0;

    /// Power-up drop defaults
    pub const DROP_RADIUS: f32 = 11.0;
    pub const DROP_FALL_SPEED: f32 = 220.0;
    pub const DROP_CULL_MARGIN: f32 = 60.0;

    /// Brick layout
    pub const BRICK_COLUMNS: u32 = 10;
    pub const BRICK_MARGIN_X: f32 = 26.0;
    pub const BRICK_TOP: f32 = 90.0;
    pub const BRICK_GAP: f32 = 8.0;
    pub const BRICK_HEIGHT: f32 = 18.0;
    pub const MIN_BRICK_ROWS: u32 = 5;
    pub const MAX_BRICK_ROWS: u32 = 10;
    pub const TOUGH_CHANCE_PER_LEVEL: f32 = 0.05;
    pub const MAX_TOUGH_CHANCE: f32 = 0.35;

    /// Snake pacing
    pub const SNAKE_COUNTDOWN_STEPS: u32 = 3;
    pub const SNAKE_COUNTDOWN_STEP_MS: f64 = 1_000.0;
    /// Game-over flash: visibility toggles and their spacing
    pub const SNAKE_FLASH_TOGGLES: u32 = 7;
    pub const SNAKE_FLASH_INTERVAL_MS: f64 = 100.0;
    /// Delay between the collision and the initials prompt
    pub const SNAKE_PROMPT_DELAY_MS: f64 = 800.0;
    /// Largest frame gap the Snake clock passes through (seconds)
    pub const SNAKE_MAX_FRAME_STEP: f32 = 0.25;
}
