//! Power-ups and the timed buffs they grant
//!
//! Timed buffs are plain expiry timestamps polled against the clock reading
//! each tick. Reapplying a timed buff overwrites its expiry (no stacking).
//! SHIELD is a charge counter instead.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Ball, BreakoutState};
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Widen,
    Slow,
    Multi,
    Laser,
    Shield,
}

/// Effect applied when a drop is caught
type Effect = fn(&mut BreakoutState, f64);

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Widen,
        PowerUpKind::Slow,
        PowerUpKind::Multi,
        PowerUpKind::Laser,
        PowerUpKind::Shield,
    ];

    /// Pick a kind from a uniform roll in [0, 1).
    ///
    /// Weights: WIDEN 26%, SLOW 24%, SHIELD 20%, MULTI 16%, LASER 14%.
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.26 {
            PowerUpKind::Widen
        } else if roll < 0.50 {
            PowerUpKind::Slow
        } else if roll < 0.70 {
            PowerUpKind::Shield
        } else if roll < 0.86 {
            PowerUpKind::Multi
        } else {
            PowerUpKind::Laser
        }
    }

    /// Capsule label
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Widen => "W",
            PowerUpKind::Slow => "S",
            PowerUpKind::Multi => "M",
            PowerUpKind::Laser => "L",
            PowerUpKind::Shield => "⛨",
        }
    }

    fn effect(self) -> Effect {
        match self {
            PowerUpKind::Widen => apply_widen,
            PowerUpKind::Slow => apply_slow,
            PowerUpKind::Multi => apply_multi,
            PowerUpKind::Laser => apply_laser,
            PowerUpKind::Shield => apply_shield,
        }
    }

    /// Apply this power-up to the session at clock reading `now_ms`
    pub fn apply(self, state: &mut BreakoutState, now_ms: f64) {
        log::debug!("Power-up {:?} at {:.0}ms", self, now_ms);
        (self.effect())(state, now_ms);
    }
}

/// Active buff state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Buffs {
    pub widen_until: f64,
    pub slow_until: f64,
    pub laser_until: f64,
    /// Saves one ball fall each (0..=3)
    pub shield_charges: u8,
    pub laser_ammo: u32,
    /// Seconds until the laser can fire again
    pub laser_cooldown: f32,
}

impl Buffs {
    pub fn widen_active(&self, now_ms: f64) -> bool {
        now_ms < self.widen_until
    }

    pub fn slow_active(&self, now_ms: f64) -> bool {
        now_ms < self.slow_until
    }

    /// Laser window open for display (strict, like the other buffs)
    pub fn laser_active(&self, now_ms: f64) -> bool {
        now_ms < self.laser_until
    }

    /// Ready to fire: ammo left, cooldown elapsed, and `now_ms` not past the
    /// window (the deadline itself still fires)
    pub fn can_fire(&self, now_ms: f64) -> bool {
        now_ms <= self.laser_until && self.laser_ammo > 0 && self.laser_cooldown <= 0.0
    }

    /// Spend a shield charge if one is available
    pub fn consume_shield(&mut self) -> bool {
        if self.shield_charges > 0 {
            self.shield_charges -= 1;
            true
        } else {
            false
        }
    }

    /// Count down the laser cooldown
    pub fn cool_down(&mut self, dt: f32) {
        self.laser_cooldown = (self.laser_cooldown - dt).max(0.0);
    }
}

fn apply_widen(state: &mut BreakoutState, now_ms: f64) {
    state.buffs.widen_until = now_ms + WIDEN_DURATION_MS;
}

fn apply_slow(state: &mut BreakoutState, now_ms: f64) {
    state.buffs.slow_until = now_ms + SLOW_DURATION_MS;
}

fn apply_laser(state: &mut BreakoutState, now_ms: f64) {
    state.buffs.laser_until = now_ms + LASER_DURATION_MS;
    state.buffs.laser_ammo = (state.buffs.laser_ammo + LASER_AMMO_PER_PICKUP).min(LASER_MAX_AMMO);
}

fn apply_shield(state: &mut BreakoutState, _now_ms: f64) {
    state.buffs.shield_charges = (state.buffs.shield_charges + 1).min(MAX_SHIELD_CHARGES);
}

/// Spawn two extra balls when one is in play, otherwise one, never past MAX_BALLS
fn apply_multi(state: &mut BreakoutState, now_ms: f64) {
    let live = state.balls.len();
    if live >= MAX_BALLS {
        return;
    }
    let Some((origin, radius)) = state.balls.first().map(|b| (b.pos, b.radius)) else {
        return;
    };

    let wanted = if live == 1 { 2 } else { 1 };
    let spawn = wanted.min(MAX_BALLS - live);
    let speed = state.ball_speed(now_ms);
    for _ in 0..spawn {
        let angle = state.rng().random_range(-MULTI_SPREAD..MULTI_SPREAD);
        state
            .balls
            .push(Ball::launched_from(origin, radius, angle, speed));
    }
}
