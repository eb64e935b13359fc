//! Breakout per-frame update
//!
//! One call advances the session by a variable `dt` (already clamped by the
//! frame clock). Buff expiry is polled against `now_ms`.

use glam::Vec2;
use rand::Rng;

use super::buffs::PowerUpKind;
use super::state::{Brick, BreakoutState, GameEvent, Laser, PowerUpDrop};
use crate::consts::*;
use crate::sim::collision::{
    Rect, Walls, bounce_off_walls, ease_toward, impact_axis, paddle_bounce_angle, reflect,
    velocity_from_angle,
};

/// Intent snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left while held (keyboard or touch button)
    pub left: bool,
    /// Move right while held
    pub right: bool,
    /// Paddle x requested by an active pointer drag (left edge, unclamped)
    pub drag_x: Option<f32>,
    /// Launch every stuck ball
    pub launch: bool,
    /// Fire the laser if armed
    pub fire: bool,
}

/// Advance the session by `dt` seconds at clock reading `now_ms`
pub fn tick(state: &mut BreakoutState, input: &TickInput, dt: f32, now_ms: f64) {
    if state.game_over {
        return;
    }

    if input.launch {
        launch_stuck_balls(state, now_ms);
    }
    if input.fire {
        fire_laser(state, now_ms);
    }

    update_paddle(state, input, dt, now_ms);

    state.buffs.cool_down(dt);
    update_lasers(state, dt);

    for ball in &mut state.balls {
        ball.pin_to(&state.paddle);
    }

    update_drops(state, dt, now_ms);

    // Waiting for launch: no ball physics
    if state.is_serving() {
        return;
    }

    update_balls(state, dt, now_ms);
    handle_falls(state);

    if state.balls.is_empty() {
        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            state.game_over = true;
            state.events.push(GameEvent::GameOver { score: state.score });
            log::info!("Game over at level {} with {}", state.level, state.score);
        } else {
            state.events.push(GameEvent::LifeLost {
                lives_left: state.lives,
            });
            state.reset_round(false);
        }
        return;
    }

    if state.live_bricks() == 0 {
        state.next_level();
        state.events.push(GameEvent::LevelCleared { level: state.level });
    }
}

/// Launch every stuck ball at a random angle. Returns true if any launched.
pub fn launch_stuck_balls(state: &mut BreakoutState, now_ms: f64) -> bool {
    let speed = state.ball_speed(now_ms);
    let mut launched = false;
    for i in 0..state.balls.len() {
        if !state.balls[i].stuck_to_paddle {
            continue;
        }
        let angle = state.rng().random_range(-LAUNCH_SPREAD..LAUNCH_SPREAD);
        state.balls[i].launch(angle, speed);
        launched = true;
    }
    if launched {
        state.events.push(GameEvent::BallLaunched);
    }
    launched
}

/// Fire two bolts from the paddle edges if the laser is ready
pub fn fire_laser(state: &mut BreakoutState, now_ms: f64) -> bool {
    if !state.buffs.can_fire(now_ms) {
        return false;
    }

    let paddle = &state.paddle;
    let y = paddle.pos.y;
    state
        .lasers
        .push(Laser::new(paddle.pos.x + LASER_EDGE_INSET, y));
    state
        .lasers
        .push(Laser::new(paddle.pos.x + paddle.width - LASER_EDGE_INSET, y));

    state.buffs.laser_ammo = state.buffs.laser_ammo.saturating_sub(LASER_AMMO_PER_SHOT);
    state.buffs.laser_cooldown = LASER_COOLDOWN;
    state.events.push(GameEvent::LaserFired);
    true
}

/// Decide whether a destroyed brick drops a power-up.
///
/// A drop spawns when `spawn_roll <= chance`; `kind_roll` then picks the kind.
pub fn drop_from_rolls(chance: f32, spawn_roll: f32, kind_roll: f32) -> Option<PowerUpKind> {
    if spawn_roll > chance {
        return None;
    }
    Some(PowerUpKind::from_roll(kind_roll))
}

/// Roll for a drop at `at` using the session RNG
pub fn maybe_spawn_drop(state: &mut BreakoutState, at: Vec2) -> Option<PowerUpKind> {
    let chance = state.difficulty.drop_chance();
    let spawn_roll: f32 = state.rng().random();
    let kind_roll: f32 = state.rng().random();
    let kind = drop_from_rolls(chance, spawn_roll, kind_roll)?;
    state.drops.push(PowerUpDrop::new(at, kind));
    state.events.push(GameEvent::DropSpawned(kind));
    Some(kind)
}

fn update_paddle(state: &mut BreakoutState, input: &TickInput, dt: f32, now_ms: f64) {
    let target = state.target_paddle_width(now_ms);
    let paddle = &mut state.paddle;
    paddle.width = ease_toward(paddle.width, target, dt, PADDLE_EASE_RATE);

    if let Some(x) = input.drag_x {
        paddle.pos.x = x;
    }
    match (input.left, input.right) {
        (true, false) => paddle.pos.x -= paddle.speed * dt,
        (false, true) => paddle.pos.x += paddle.speed * dt,
        _ => {}
    }
    paddle.clamp_to(state.viewport.x);
}

/// Apply one hit to `brick`, credit the score and record the event.
/// Returns true if the brick was destroyed.
fn strike(brick: &mut Brick, score: &mut u64, events: &mut Vec<GameEvent>) -> bool {
    let awarded = brick.hit();
    *score += u64::from(awarded);
    let destroyed = !brick.is_alive();
    events.push(GameEvent::BrickHit { destroyed, awarded });
    destroyed
}

fn update_lasers(state: &mut BreakoutState, dt: f32) {
    let bricks = &mut state.bricks;
    let score = &mut state.score;
    let events = &mut state.events;

    state.lasers.retain_mut(|laser| {
        laser.pos.y += laser.vy * dt;
        if laser.pos.y <= LASER_CEILING {
            return false;
        }
        let rect = laser.rect();
        match bricks
            .iter_mut()
            .find(|b| b.is_alive() && rect.intersects(&b.rect))
        {
            Some(brick) => {
                strike(brick, score, events);
                false
            }
            None => true,
        }
    });
}

fn update_drops(state: &mut BreakoutState, dt: f32, now_ms: f64) {
    let paddle_rect = state.paddle.rect();
    let cull_y = state.viewport.y + DROP_CULL_MARGIN;
    let mut caught = Vec::new();

    state.drops.retain_mut(|drop| {
        drop.pos.y += drop.fall_speed * dt;
        if drop.bounds().intersects(&paddle_rect) {
            caught.push(drop.kind);
            return false;
        }
        drop.pos.y < cull_y
    });

    for kind in caught {
        kind.apply(state, now_ms);
        state.events.push(GameEvent::PowerUpCaught(kind));
    }
}

fn update_balls(state: &mut BreakoutState, dt: f32, now_ms: f64) {
    let walls = Walls {
        left: WALL_INSET,
        right: state.viewport.x - WALL_INSET,
        top: PLAYFIELD_TOP,
    };
    let fallback_speed = state.ball_speed(now_ms);
    let paddle_rect = state.paddle.rect();
    let paddle_center = state.paddle.center_x();
    let half_width = state.paddle.width / 2.0;
    let mut destroyed_at = Vec::new();

    for ball in state.balls.iter_mut().filter(|b| !b.stuck_to_paddle) {
        ball.pos += ball.vel * dt;

        if bounce_off_walls(&mut ball.pos, &mut ball.vel, ball.radius, &walls) {
            state.events.push(GameEvent::WallHit);
        }

        let bounds = ball.bounds();
        if ball.vel.y > 0.0 && bounds.intersects(&paddle_rect) {
            ball.pos.y = paddle_rect.y - ball.radius - 0.5;
            let angle = paddle_bounce_angle(ball.pos.x - paddle_center, half_width, MAX_BOUNCE_ANGLE);
            let speed = match ball.vel.length() {
                s if s > 0.0 => s,
                _ => fallback_speed,
            };
            ball.vel = velocity_from_angle(angle, speed);
            state.events.push(GameEvent::PaddleHit);
        }

        // First live brick only, in layout order
        if let Some(brick) = state
            .bricks
            .iter_mut()
            .find(|b| b.is_alive() && bounds.intersects(&b.rect))
        {
            let previous = Rect::around_circle(ball.pos - ball.vel * dt, ball.radius);
            ball.vel = reflect(ball.vel, impact_axis(&previous, &brick.rect));
            if strike(brick, &mut state.score, &mut state.events) {
                destroyed_at.push(brick.rect.center());
            }
        }
    }

    for at in destroyed_at {
        maybe_spawn_drop(state, at);
    }
}

/// Rescue or remove balls that fell past the floor
fn handle_falls(state: &mut BreakoutState) {
    let loss_y = state.viewport.y + BALL_LOSS_MARGIN;
    let rescue_y = state.viewport.y - SHIELD_RESCUE_OFFSET;
    let buffs = &mut state.buffs;
    let events = &mut state.events;

    state.balls.retain_mut(|ball| {
        if ball.stuck_to_paddle || ball.pos.y - ball.radius <= loss_y {
            return true;
        }
        if buffs.consume_shield() {
            ball.pos.y = rescue_y;
            ball.vel.y = -ball.vel.y.abs();
            events.push(GameEvent::ShieldSaved);
            log::debug!("Shield consumed, {} left", buffs.shield_charges);
            return true;
        }
        false
    });
}
