//! Rendering
//!
//! Drawing is a pure read of simulation state through a small immediate-mode
//! [`Renderer`] trait. The browser build implements it on a Canvas 2D
//! context; tests record the calls.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::app::Screen;
use crate::consts::PLAYFIELD_TOP;
use crate::sim::breakout::{BreakoutState, PowerUpKind};
use crate::sim::collision::Rect;
use crate::sim::snake::SnakeState;

/// RGBA, each channel 0.0 - 1.0
pub type Color = [f32; 4];

pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = [0.03, 0.03, 0.05, 1.0];
    pub const HUD_BAND: Color = [0.0, 0.0, 0.0, 0.45];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const PADDLE: Color = [0.92, 0.92, 0.95, 1.0];
    pub const BALL: Color = [1.0, 1.0, 1.0, 1.0];
    pub const LASER: Color = [1.0, 0.3, 0.3, 1.0];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.6];

    /// Brick fill by remaining hit points
    pub fn brick(hp: u8) -> Color {
        match hp {
            0 | 1 => [0.85, 0.15, 0.2, 1.0],
            2 => [0.95, 0.55, 0.15, 1.0],
            _ => [0.7, 0.7, 0.78, 1.0],
        }
    }

    pub const SNAKE_BG: Color = [0.0, 0.0, 0.0, 1.0];
    pub const SNAKE_HEAD: Color = [1.0, 0.27, 0.33, 1.0];
    pub const SNAKE_BODY: Color = [0.67, 0.67, 0.67, 1.0];
    pub const SNAKE_OUTLINE: Color = [0.2, 0.2, 0.2, 1.0];
    pub const FOOD: Color = [0.0, 1.0, 0.0, 1.0];
}

/// Capsule fill for a power-up
pub fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Widen => [0.3, 0.8, 1.0, 1.0],
        PowerUpKind::Slow => [0.5, 0.9, 0.4, 1.0],
        PowerUpKind::Multi => [1.0, 0.85, 0.2, 1.0],
        PowerUpKind::Laser => [1.0, 0.3, 0.3, 1.0],
        PowerUpKind::Shield => [0.7, 0.5, 1.0, 1.0],
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Immediate-mode 2D drawing surface
pub trait Renderer {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Draw text with its baseline at `pos`
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, align: TextAlign);
}

/// Draw a Breakout frame
pub fn draw_breakout(r: &mut impl Renderer, state: &BreakoutState, screen: Screen, now_ms: f64) {
    let w = state.viewport.x;
    let h = state.viewport.y;
    r.clear(palette::BACKGROUND);

    for brick in state.bricks.iter().filter(|b| b.is_alive()) {
        r.fill_rect(brick.rect, palette::brick(brick.hp));
    }

    for drop in &state.drops {
        r.fill_circle(drop.pos, drop.radius, power_up_color(drop.kind));
        r.text(
            drop.kind.label(),
            drop.pos + Vec2::new(0.0, 4.0),
            12.0,
            palette::BACKGROUND,
            TextAlign::Center,
        );
    }

    for laser in &state.lasers {
        r.fill_rect(laser.rect(), palette::LASER);
    }

    r.fill_rect(state.paddle.rect(), palette::PADDLE);
    for ball in &state.balls {
        r.fill_circle(ball.pos, ball.radius, palette::BALL);
    }

    // HUD band above the top wall
    r.fill_rect(Rect::new(0.0, 0.0, w, PLAYFIELD_TOP), palette::HUD_BAND);
    r.text(
        &format!(
            "{}  {}  LV {}",
            state.mode.as_str().to_uppercase(),
            state.difficulty.as_str().to_uppercase(),
            state.level
        ),
        Vec2::new(18.0, 24.0),
        14.0,
        palette::TEXT,
        TextAlign::Left,
    );
    r.text(
        &state.hud_line(now_ms),
        Vec2::new(18.0, 44.0),
        14.0,
        palette::TEXT,
        TextAlign::Left,
    );
    r.text(
        &state.score.to_string(),
        Vec2::new(w - 18.0, 34.0),
        20.0,
        palette::TEXT,
        TextAlign::Right,
    );

    let center = Vec2::new(w / 2.0, h / 2.0);
    match screen {
        Screen::Playing if state.is_serving() => {
            r.text(
                "Tap / Click or press SPACE to launch",
                Vec2::new(w / 2.0, h * 0.62),
                16.0,
                palette::TEXT,
                TextAlign::Center,
            );
        }
        Screen::Playing => {}
        Screen::Paused => overlay(r, w, h, "Paused", center),
        Screen::GameOver => overlay(
            r,
            w,
            h,
            &format!("Game Over  {}", state.score),
            center,
        ),
        Screen::Menu => overlay(r, w, h, "Breakout", center),
    }
}

fn overlay(r: &mut impl Renderer, w: f32, h: f32, title: &str, center: Vec2) {
    r.fill_rect(Rect::new(0.0, 0.0, w, h), palette::OVERLAY);
    r.text(title, center, 32.0, palette::TEXT, TextAlign::Center);
}

/// Draw a Snake frame on a square canvas of `size` pixels, with the score
/// and best score along the top edge.
///
/// While the game-over flash has the canvas hidden only the background is drawn.
pub fn draw_snake(r: &mut impl Renderer, state: &SnakeState, best: u64, size: f32, visible: bool) {
    r.clear(palette::SNAKE_BG);
    if !visible {
        return;
    }

    let cell = (size / state.grid as f32).floor().max(1.0);
    let rect_of = |x: i32, y: i32| Rect::new(x as f32 * cell, y as f32 * cell, cell, cell);

    for (i, seg) in state.body.iter().enumerate() {
        let color = if i == 0 {
            palette::SNAKE_HEAD
        } else {
            palette::SNAKE_BODY
        };
        let rect = rect_of(seg.x, seg.y);
        r.fill_rect(rect, color);
        r.stroke_rect(rect, palette::SNAKE_OUTLINE);
    }

    if let Some(food) = state.food {
        r.fill_rect(rect_of(food.x, food.y), palette::FOOD);
    }

    let best = best.max(u64::from(state.score));
    r.text(
        &format!("Score {}", state.score),
        Vec2::new(8.0, 18.0),
        14.0,
        palette::TEXT,
        TextAlign::Left,
    );
    r.text(
        &format!("Best {}", best),
        Vec2::new(size - 8.0, 18.0),
        14.0,
        palette::TEXT,
        TextAlign::Right,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::breakout::{Difficulty, Mode};
    use crate::sim::snake::Cell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Fill(Rect, Color),
        Stroke(Rect),
        Circle(Vec2, f32),
        Text(String),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Renderer for Recorder {
        fn clear(&mut self, _color: Color) {
            self.calls.push(Call::Clear);
        }
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.calls.push(Call::Fill(rect, color));
        }
        fn stroke_rect(&mut self, rect: Rect, _color: Color) {
            self.calls.push(Call::Stroke(rect));
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Color) {
            self.calls.push(Call::Circle(center, radius));
        }
        fn text(&mut self, text: &str, _pos: Vec2, _size: f32, _color: Color, _align: TextAlign) {
            self.calls.push(Call::Text(text.to_string()));
        }
    }

    #[test]
    fn test_breakout_draws_live_bricks_only() {
        let mut state = BreakoutState::new(Vec2::new(800.0, 600.0), Mode::Arcade, Difficulty::Normal, 1);
        state.bricks[0].hp = 0;
        let mut rec = Recorder::default();
        draw_breakout(&mut rec, &state, Screen::Playing, 0.0);

        let brick_fills = rec
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Fill(_, color) if *color == palette::brick(1)))
            .count();
        assert_eq!(brick_fills, 49);
        assert_eq!(rec.calls[0], Call::Clear);
        assert!(rec.calls.contains(&Call::Circle(state.balls[0].pos, 7.0)));
        assert!(rec.calls.contains(&Call::Text("♥♥♥".to_string())));
        assert!(
            rec.calls
                .contains(&Call::Text("Tap / Click or press SPACE to launch".to_string()))
        );
    }

    #[test]
    fn test_breakout_pause_overlay() {
        let state = BreakoutState::new(Vec2::new(800.0, 600.0), Mode::Campaign, Difficulty::Easy, 1);
        let mut rec = Recorder::default();
        draw_breakout(&mut rec, &state, Screen::Paused, 0.0);
        assert!(rec.calls.contains(&Call::Text("Paused".to_string())));
        assert!(rec.calls.contains(&Call::Text("CAMPAIGN  EASY  LV 1".to_string())));
    }

    #[test]
    fn test_snake_cells() {
        let mut state = SnakeState::new(1);
        state.body.push_back(Cell::new(8, 10));
        state.food = Some(Cell::new(2, 3));
        state.score = 4;
        let mut rec = Recorder::default();
        draw_snake(&mut rec, &state, 12, 400.0, true);

        assert!(rec.calls.contains(&Call::Fill(
            Rect::new(180.0, 200.0, 20.0, 20.0),
            palette::SNAKE_HEAD
        )));
        assert!(rec.calls.contains(&Call::Fill(
            Rect::new(40.0, 60.0, 20.0, 20.0),
            palette::FOOD
        )));
        assert_eq!(
            rec.calls.iter().filter(|c| matches!(c, Call::Stroke(_))).count(),
            2
        );
        assert!(rec.calls.contains(&Call::Text("Score 4".to_string())));
        assert!(rec.calls.contains(&Call::Text("Best 12".to_string())));
    }

    #[test]
    fn test_snake_best_tracks_live_score() {
        let mut state = SnakeState::new(1);
        state.score = 20;
        let mut rec = Recorder::default();
        draw_snake(&mut rec, &state, 12, 400.0, true);
        assert!(rec.calls.contains(&Call::Text("Best 20".to_string())));
    }

    #[test]
    fn test_snake_hidden_during_flash() {
        let state = SnakeState::new(1);
        let mut rec = Recorder::default();
        draw_snake(&mut rec, &state, 0, 400.0, false);
        assert_eq!(rec.calls, vec![Call::Clear]);
    }
}
