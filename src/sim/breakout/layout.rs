//! Brick layout generation

use rand::Rng;

use super::state::{Brick, Difficulty, Mode};
use crate::consts::*;
use crate::sim::collision::Rect;

/// Number of brick rows for a level
pub fn row_count(mode: Mode, level: u32) -> u32 {
    let (base, extra) = match mode {
        Mode::Arcade => (5, level.saturating_sub(1) / 2),
        Mode::Campaign => (6, 0),
    };
    (base + extra).clamp(MIN_BRICK_ROWS, MAX_BRICK_ROWS)
}

/// Brick width that exactly fills the playfield between the margins
pub fn brick_width(viewport_width: f32) -> f32 {
    let cols = BRICK_COLUMNS as f32;
    ((viewport_width - BRICK_MARGIN_X * 2.0 - BRICK_GAP * (cols - 1.0)) / cols)
        .floor()
        .max(1.0)
}

/// Chance an arcade brick gets an extra hit point
pub fn tough_chance(level: u32) -> f32 {
    (level.saturating_sub(1) as f32 * TOUGH_CHANCE_PER_LEVEL).clamp(0.0, MAX_TOUGH_CHANCE)
}

/// Build the brick wall for `level`.
///
/// Rows nearer the top are worth more: `(rows - row) * 10` points.
pub fn build_level<R: Rng>(
    rng: &mut R,
    viewport_width: f32,
    mode: Mode,
    difficulty: Difficulty,
    level: u32,
) -> Vec<Brick> {
    let rows = row_count(mode, level);
    let w = brick_width(viewport_width);
    let tough = tough_chance(level);

    let mut bricks = Vec::with_capacity((rows * BRICK_COLUMNS) as usize);
    for row in 0..rows {
        for col in 0..BRICK_COLUMNS {
            let x = BRICK_MARGIN_X + col as f32 * (w + BRICK_GAP);
            let y = BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP);

            let mut hp = 1;
            if mode == Mode::Arcade {
                if rng.random::<f32>() < tough {
                    hp = 2;
                }
                // Independent second roll on hard
                if difficulty == Difficulty::Hard && rng.random::<f32>() < tough * 0.5 {
                    hp = 3;
                }
            }

            bricks.push(Brick {
                rect: Rect::new(x, y, w, BRICK_HEIGHT),
                hp,
                points: (rows - row) * 10,
            });
        }
    }
    bricks
}
