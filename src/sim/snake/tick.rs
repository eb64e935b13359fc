//! One Snake step

use super::state::SnakeState;

/// What ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfHit,
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved one cell, length unchanged
    Moved,
    /// Ate the food and grew by one
    Ate,
    /// Game over
    Collided(Collision),
    /// Ate the last free cell; nowhere left to place food
    BoardFilled,
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Collided(_) | StepOutcome::BoardFilled)
    }
}

/// Advance the snake one cell in the latched direction.
///
/// The tail is released before the self-collision test, so stepping into
/// the cell the tail is leaving is legal.
pub fn step(state: &mut SnakeState) -> StepOutcome {
    if !state.alive {
        return StepOutcome::Collided(Collision::SelfHit);
    }

    let dir = state.pending;
    let next = state.head().step(dir);
    let eats = state.food == Some(next);

    if !state.in_bounds(next) {
        return die(state, Collision::Wall);
    }

    let released = if eats { None } else { state.body.pop_back() };
    if state.occupies(next) {
        if let Some(tail) = released {
            state.body.push_back(tail);
        }
        return die(state, Collision::SelfHit);
    }

    state.body.push_front(next);
    state.heading = dir;

    if !eats {
        return StepOutcome::Moved;
    }

    state.score += 1;
    state.food = state.place_food();
    if state.food.is_none() {
        state.alive = false;
        log::info!("Snake filled the board with {}", state.score);
        return StepOutcome::BoardFilled;
    }
    StepOutcome::Ate
}

fn die(state: &mut SnakeState, cause: Collision) -> StepOutcome {
    state.alive = false;
    log::info!("Snake hit {:?} with score {}", cause, state.score);
    StepOutcome::Collided(cause)
}
