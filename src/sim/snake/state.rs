//! Snake session state

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Default board size (cells per side)
pub const GRID_SIZE: i32 = 20;

/// Head position at the start of a game
pub const START_CELL: Cell = Cell { x: 9, y: 10 };

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Movement direction (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Step cadence selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakeDifficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl SnakeDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnakeDifficulty::Easy => "easy",
            SnakeDifficulty::Normal => "normal",
            SnakeDifficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(SnakeDifficulty::Easy),
            "normal" => Some(SnakeDifficulty::Normal),
            "hard" => Some(SnakeDifficulty::Hard),
            _ => None,
        }
    }

    /// Milliseconds between steps
    pub fn interval_ms(&self) -> f64 {
        match self {
            SnakeDifficulty::Easy => 150.0,
            SnakeDifficulty::Normal => 100.0,
            SnakeDifficulty::Hard => 70.0,
        }
    }
}

/// Complete Snake session
#[derive(Debug, Clone)]
pub struct SnakeState {
    /// Cells per side
    pub grid: i32,
    /// Head at the front
    pub body: VecDeque<Cell>,
    /// Direction of the last committed step
    pub heading: Direction,
    /// Direction the next step will take
    pub pending: Direction,
    /// `None` only once the board is full
    pub food: Option<Cell>,
    pub score: u32,
    pub alive: bool,
    rng: Pcg32,
}

impl SnakeState {
    /// Single-cell snake at (9, 10) heading right, food placed
    pub fn new(seed: u64) -> Self {
        Self::with_grid(GRID_SIZE, seed)
    }

    pub fn with_grid(grid: i32, seed: u64) -> Self {
        let grid = grid.max(3);
        let start = Cell::new(START_CELL.x.min(grid - 1), START_CELL.y.min(grid - 1));
        let mut state = Self {
            grid,
            body: VecDeque::from([start]),
            heading: Direction::Right,
            pending: Direction::Right,
            food: None,
            score: 0,
            alive: true,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.food = state.place_food();
        log::info!("Snake started on a {}x{} grid", grid, grid);
        state
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(START_CELL)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.grid).contains(&cell.x) && (0..self.grid).contains(&cell.y)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Request a turn. A reversal of the current heading is ignored.
    ///
    /// Returns true if the request was latched.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if !self.alive || dir == self.heading.opposite() {
            return false;
        }
        self.pending = dir;
        true
    }

    /// Pick a random free cell for the food.
    ///
    /// Prefers the interior `[1, grid - 2]`; falls back to any free cell.
    pub fn place_food(&mut self) -> Option<Cell> {
        let interior: Vec<Cell> = (1..self.grid - 1)
            .flat_map(|y| (1..self.grid - 1).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.occupies(*c))
            .collect();

        let candidates = if interior.is_empty() {
            (0..self.grid)
                .flat_map(|y| (0..self.grid).map(move |x| Cell::new(x, y)))
                .filter(|c| !self.occupies(*c))
                .collect()
        } else {
            interior
        };

        if candidates.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..candidates.len());
        Some(candidates[idx])
    }
}
