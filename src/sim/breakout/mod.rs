//! Breakout rules: paddle, balls, bricks, power-ups, lasers and shield

pub mod buffs;
pub mod layout;
pub mod state;
pub mod tick;

pub use buffs::{Buffs, PowerUpKind};
pub use layout::build_level;
pub use state::{
    Ball, BreakoutState, Brick, Difficulty, GameEvent, Laser, Mode, Paddle, PowerUpDrop,
};
pub use tick::{TickInput, fire_laser, launch_stuck_balls, maybe_spawn_drop, tick};
