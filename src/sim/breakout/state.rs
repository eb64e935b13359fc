//! Breakout session state and entity types
//!
//! One [`BreakoutState`] lives for one game. Everything the tick touches is a
//! field here; nothing lives in module-level globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::buffs::{Buffs, PowerUpKind};
use super::layout::build_level;
use crate::consts::*;
use crate::sim::collision::{Rect, clamp_range, velocity_from_angle};

/// Difficulty selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Lives at the start of a session
    pub fn starting_lives(&self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => 3,
            Difficulty::Hard => 2,
        }
    }

    /// Resting paddle width
    pub fn paddle_width(&self) -> f32 {
        match self {
            Difficulty::Easy => 170.0,
            Difficulty::Normal => 140.0,
            Difficulty::Hard => 120.0,
        }
    }

    /// Ball speed (px/s) before buffs
    pub fn ball_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 470.0,
            Difficulty::Normal => 520.0,
            Difficulty::Hard => 600.0,
        }
    }

    /// Chance a destroyed brick drops a power-up
    pub fn drop_chance(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.22,
            Difficulty::Normal => 0.18,
            Difficulty::Hard => 0.14,
        }
    }
}

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Rows and brick toughness grow with level
    #[default]
    Arcade,
    /// Fixed six-row layout of single-hit bricks
    Campaign,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Arcade => "arcade",
            Mode::Campaign => "campaign",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arcade" => Some(Mode::Arcade),
            "campaign" => Some(Mode::Campaign),
            _ => None,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    /// Current (eased) width
    pub width: f32,
    pub height: f32,
    /// Horizontal speed while a direction is held (px/s)
    pub speed: f32,
}

impl Paddle {
    pub fn new(width: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            width,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Keep the paddle inside `[8, viewport_width - width - 8]`
    pub fn clamp_to(&mut self, viewport_width: f32) {
        self.pos.x = clamp_range(
            self.pos.x,
            WALL_INSET,
            viewport_width - self.width - WALL_INSET,
        );
    }
}

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Resting on the paddle, waiting for launch
    pub stuck_to_paddle: bool,
}

impl Ball {
    /// A new ball resting on the paddle
    pub fn stuck_on(paddle: &Paddle) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            stuck_to_paddle: true,
        };
        ball.pin_to(paddle);
        ball
    }

    /// A free ball leaving `pos` at `angle` from vertical
    pub fn launched_from(pos: Vec2, radius: f32, angle: f32, speed: f32) -> Self {
        Self {
            pos,
            vel: velocity_from_angle(angle, speed),
            radius,
            stuck_to_paddle: false,
        }
    }

    /// Re-seat a stuck ball just above the paddle center
    pub fn pin_to(&mut self, paddle: &Paddle) {
        if self.stuck_to_paddle {
            self.pos = Vec2::new(paddle.center_x(), paddle.pos.y - self.radius - 2.0);
            self.vel = Vec2::ZERO;
        }
    }

    /// Free a stuck ball
    pub fn launch(&mut self, angle: f32, speed: f32) {
        if self.stuck_to_paddle {
            self.vel = velocity_from_angle(angle, speed);
            self.stuck_to_paddle = false;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }
}

/// A brick entity
#[derive(Debug, Clone)]
pub struct Brick {
    pub rect: Rect,
    pub hp: u8,
    /// Score for the destroying hit
    pub points: u32,
}

impl Brick {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply one hit and return the score it is worth.
    ///
    /// A destroying hit pays full `points`; otherwise `points / 3` (floored).
    pub fn hit(&mut self) -> u32 {
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.points
        } else {
            self.points / 3
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone)]
pub struct PowerUpDrop {
    pub pos: Vec2,
    pub radius: f32,
    pub fall_speed: f32,
    pub kind: PowerUpKind,
}

impl PowerUpDrop {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            radius: DROP_RADIUS,
            fall_speed: DROP_FALL_SPEED,
            kind,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }
}

/// A laser bolt (tip at `pos`, travelling up)
#[derive(Debug, Clone)]
pub struct Laser {
    pub pos: Vec2,
    pub vy: f32,
}

impl Laser {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vy: -LASER_SPEED,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x - 2.0, self.pos.y - 10.0, 4.0, 12.0)
    }
}

/// Something the renderer, audio or score bridge may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    BallLaunched,
    WallHit,
    PaddleHit,
    BrickHit { destroyed: bool, awarded: u32 },
    DropSpawned(PowerUpKind),
    PowerUpCaught(PowerUpKind),
    LaserFired,
    ShieldSaved,
    LifeLost { lives_left: u32 },
    LevelCleared { level: u32 },
    GameOver { score: u64 },
}

/// Complete Breakout session
#[derive(Debug, Clone)]
pub struct BreakoutState {
    /// Playfield size in CSS pixels
    pub viewport: Vec2,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub drops: Vec<PowerUpDrop>,
    pub lasers: Vec<Laser>,
    pub buffs: Buffs,
    /// Paddle width the easing settles on when no WIDEN is active
    pub base_paddle_width: f32,
    pub ball_base_speed: f32,
    /// Lives exhausted; the tick is a no-op from here on
    pub game_over: bool,
    /// Events produced since the controller last drained them
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl BreakoutState {
    /// Start a new session: tuning applied, paddle centered, level 1 built
    pub fn new(viewport: Vec2, mode: Mode, difficulty: Difficulty, seed: u64) -> Self {
        let mut state = Self {
            viewport,
            mode,
            difficulty,
            score: 0,
            level: 1,
            lives: difficulty.starting_lives(),
            paddle: Paddle::new(difficulty.paddle_width()),
            balls: Vec::with_capacity(MAX_BALLS),
            bricks: Vec::new(),
            drops: Vec::new(),
            lasers: Vec::new(),
            buffs: Buffs::default(),
            base_paddle_width: difficulty.paddle_width(),
            ball_base_speed: difficulty.ball_speed(),
            game_over: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };

        state.apply_tuning();
        state.reset_round(true);
        state.bricks = build_level(
            &mut state.rng,
            state.viewport.x,
            state.mode,
            state.difficulty,
            state.level,
        );

        log::info!(
            "Breakout started ({} / {}), {} bricks",
            mode.as_str(),
            difficulty.as_str(),
            state.bricks.len()
        );
        state
    }

    /// Session RNG (seeded at construction)
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Re-apply difficulty tuning (paddle target width, ball base speed)
    pub fn apply_tuning(&mut self) {
        self.base_paddle_width = self.difficulty.paddle_width();
        self.ball_base_speed = self.difficulty.ball_speed();
    }

    /// Start a round with one ball resting on the paddle.
    ///
    /// `recenter` also moves the paddle to the middle of the floor.
    pub fn reset_round(&mut self, recenter: bool) {
        self.paddle.pos.y = self.viewport.y - PADDLE_FLOOR_OFFSET;
        if recenter {
            self.paddle.pos.x = (self.viewport.x - self.paddle.width) / 2.0;
        }
        self.paddle.clamp_to(self.viewport.x);

        self.balls.clear();
        self.balls.push(Ball::stuck_on(&self.paddle));
    }

    /// Advance to the next level with a fresh layout
    pub fn next_level(&mut self) {
        self.level += 1;
        self.apply_tuning();
        self.bricks = build_level(
            &mut self.rng,
            self.viewport.x,
            self.mode,
            self.difficulty,
            self.level,
        );
        self.reset_round(true);
        log::info!("Level {} ({} bricks)", self.level, self.bricks.len());
    }

    /// Speed for newly launched balls (SLOW applies while active)
    pub fn ball_speed(&self, now_ms: f64) -> f32 {
        if self.buffs.slow_active(now_ms) {
            self.ball_base_speed * SLOW_FACTOR
        } else {
            self.ball_base_speed
        }
    }

    /// Width the paddle is easing toward
    pub fn target_paddle_width(&self, now_ms: f64) -> f32 {
        if self.buffs.widen_active(now_ms) {
            (PADDLE_REFERENCE_WIDTH + WIDEN_BONUS).clamp(PADDLE_MIN_WIDTH, PADDLE_MAX_WIDTH)
        } else {
            self.base_paddle_width
        }
    }

    /// True while every ball is waiting for launch
    pub fn is_serving(&self) -> bool {
        self.balls.iter().all(|b| b.stuck_to_paddle)
    }

    pub fn live_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_alive()).count()
    }

    /// Viewport resized: keep the paddle on the floor and inside the walls
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.paddle.pos.y = viewport.y - PADDLE_FLOOR_OFFSET;
        self.paddle.clamp_to(viewport.x);
        for ball in &mut self.balls {
            ball.pin_to(&self.paddle);
        }
    }

    /// One-line HUD summary: hearts, shield charges, laser ammo, ball count
    pub fn hud_line(&self, now_ms: f64) -> String {
        let mut line = "♥".repeat(self.lives.min(9) as usize);
        if self.buffs.shield_charges > 0 {
            line.push_str(&format!("  ⛨{}", self.buffs.shield_charges));
        }
        if self.buffs.laser_active(now_ms) {
            line.push_str(&format!("  ⟡{}", self.buffs.laser_ammo));
        }
        if self.balls.len() > 1 {
            line.push_str(&format!("  ●{}", self.balls.len()));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn test_new_session() {
        let state = BreakoutState::new(viewport(), Mode::Arcade, Difficulty::Normal, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.balls.len(), 1);
        assert!(state.is_serving());
        assert_eq!(state.bricks.len(), 50);
        assert_eq!(state.paddle.width, 140.0);
        // Centered on the floor
        assert_eq!(state.paddle.pos.x, 330.0);
        assert_eq!(state.paddle.pos.y, 558.0);
    }

    #[test]
    fn test_difficulty_tuning() {
        let easy = BreakoutState::new(viewport(), Mode::Arcade, Difficulty::Easy, 1);
        assert_eq!(easy.lives, 5);
        assert_eq!(easy.base_paddle_width, 170.0);
        assert_eq!(easy.ball_base_speed, 470.0);

        let hard = BreakoutState::new(viewport(), Mode::Arcade, Difficulty::Hard, 1);
        assert_eq!(hard.lives, 2);
        assert_eq!(hard.base_paddle_width, 120.0);
        assert_eq!(hard.ball_base_speed, 600.0);
    }

    #[test]
    fn test_stuck_ball_rests_on_paddle() {
        let state = BreakoutState::new(viewport(), Mode::Arcade, Difficulty::Normal, 1);
        let ball = &state.balls[0];
        assert_eq!(ball.vel, Vec2::ZERO);
        assert_eq!(ball.pos.x, state.paddle.center_x());
        assert_eq!(ball.pos.y, state.paddle.pos.y - ball.radius - 2.0);
    }

    #[test]
    fn test_brick_hit_scoring() {
        let mut brick = Brick {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            hp: 2,
            points: 50,
        };
        assert_eq!(brick.hit(), 16);
        assert!(brick.is_alive());
        assert_eq!(brick.hit(), 50);
        assert!(!brick.is_alive());
    }

    #[test]
    fn test_difficulty_round_trip_names() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Mode::from_str("Campaign"), Some(Mode::Campaign));
        assert_eq!(Difficulty::from_str("insane"), None);
    }

    #[test]
    fn test_hud_line() {
        let mut state = BreakoutState::new(viewport(), Mode::Arcade, Difficulty::Normal, 1);
        assert_eq!(state.hud_line(0.0), "♥♥♥");
        state.buffs.shield_charges = 2;
        state.buffs.laser_until = 5_000.0;
        state.buffs.laser_ammo = 18;
        assert_eq!(state.hud_line(0.0), "♥♥♥  ⛨2  ⟡18");
        // Ammo is hidden once the window closes
        assert_eq!(state.hud_line(5_000.0), "♥♥♥  ⛨2");
    }

    #[test]
    fn test_resize_keeps_paddle_inside() {
        let mut state = BreakoutState::new(viewport(), Mode::Arcade, Difficulty::Normal, 1);
        state.paddle.pos.x = 600.0;
        state.resize(Vec2::new(400.0, 300.0));
        assert_eq!(state.paddle.pos.x, 400.0 - 140.0 - 8.0);
        assert_eq!(state.paddle.pos.y, 258.0);
        assert_eq!(state.balls[0].pos.x, state.paddle.center_x());
    }
}
