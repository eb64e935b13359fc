//! Game controllers
//!
//! A controller owns one session, its clock, the input queue and the score
//! bridge. The platform layer only forwards events and animation frames.

pub mod breakout;
pub mod snake;

pub use breakout::{BreakoutApp, Screen};
pub use snake::{SnakeApp, SnakePhase};
