//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM,
//! storage or audio:
//! - Session state is a plain struct passed by `&mut` into a tick function
//! - Randomness comes from a per-session seeded RNG
//! - Time comes in as arguments (dt and clock readings)

pub mod breakout;
pub mod clock;
pub mod collision;
pub mod snake;

pub use clock::{FrameClock, IntervalTimer};
pub use collision::{Rect, Walls};
