//! Snake rules on a square grid

pub mod state;
pub mod tick;

pub use state::{Cell, Direction, GRID_SIZE, SnakeDifficulty, SnakeState};
pub use tick::{Collision, StepOutcome, step};
