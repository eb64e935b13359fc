//! Axis-aligned collision helpers
//!
//! Everything in the playfield is an axis-aligned rectangle or a circle tested
//! through its bounding box. Reflection flips a single velocity component.

use glam::Vec2;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            x: center.x - radius,
            y: center.y - radius,
            w: radius * 2.0,
            h: radius * 2.0,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test (touching edges do not intersect)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Whether `x` lies within the horizontal span (inclusive)
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }
}

/// Which velocity component an impact reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactAxis {
    /// Side hit: flip vx
    Horizontal,
    /// Top/bottom hit: flip vy
    Vertical,
}

/// Decide the impact axis from where the mover was before this tick.
///
/// If the previous box was entirely left or right of the target the hit
/// came from the side, otherwise from above or below.
pub fn impact_axis(previous: &Rect, target: &Rect) -> ImpactAxis {
    let was_left = previous.right() <= target.x;
    let was_right = previous.x >= target.right();
    if was_left || was_right {
        ImpactAxis::Horizontal
    } else {
        ImpactAxis::Vertical
    }
}

/// Reflect a velocity on one axis
#[inline]
pub fn reflect(vel: Vec2, axis: ImpactAxis) -> Vec2 {
    match axis {
        ImpactAxis::Horizontal => Vec2::new(-vel.x, vel.y),
        ImpactAxis::Vertical => Vec2::new(vel.x, -vel.y),
    }
}

/// Playfield walls (no floor: the bottom is open)
#[derive(Debug, Clone, Copy)]
pub struct Walls {
    pub left: f32,
    pub right: f32,
    pub top: f32,
}

/// Bounce a circle off the walls.
///
/// Each penetrated wall flips the normal component and the position is
/// clamped back inside on the same tick. Returns true if any wall was hit.
pub fn bounce_off_walls(pos: &mut Vec2, vel: &mut Vec2, radius: f32, walls: &Walls) -> bool {
    let mut hit = false;
    if pos.x - radius < walls.left {
        pos.x = walls.left + radius;
        vel.x = -vel.x;
        hit = true;
    }
    if pos.x + radius > walls.right {
        pos.x = walls.right - radius;
        vel.x = -vel.x;
        hit = true;
    }
    if pos.y - radius < walls.top {
        pos.y = walls.top + radius;
        vel.y = -vel.y;
        hit = true;
    }
    hit
}

/// Velocity for a launch angle measured from straight up (positive = right)
#[inline]
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.sin() * speed, -angle.cos() * speed)
}

/// Paddle deflection angle for a hit `offset` from the paddle center
///
/// `half_width` normalizes the offset to [-1, 1] before scaling by `max_angle`.
pub fn paddle_bounce_angle(offset: f32, half_width: f32, max_angle: f32) -> f32 {
    if half_width <= 0.0 {
        return 0.0;
    }
    (offset / half_width).clamp(-1.0, 1.0) * max_angle
}

/// Clamp that never panics: if the range is inverted the lower bound wins
#[inline]
pub fn clamp_range(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi).max(lo)
}

/// Exponential ease toward `target`; never overshoots
#[inline]
pub fn ease_toward(current: f32, target: f32, dt: f32, rate: f32) -> f32 {
    current + (target - current) * (dt * rate).clamp(0.0, 1.0)
}
