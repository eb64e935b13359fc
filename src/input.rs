//! Input events and the per-tick intent queue
//!
//! DOM listeners only push [`InputEvent`]s. The controller drains the queue
//! once at the top of each frame, so the simulation sees a single consistent
//! snapshot no matter how many events arrived in between.

use std::collections::VecDeque;

use crate::sim::snake::Direction;

/// Keys the games care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    A,
    D,
    Space,
    P,
    F,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent` (`key`, `code`) pair
    pub fn from_dom(key: &str, code: &str) -> Self {
        if code == "Space" {
            return Key::Space;
        }
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "a" | "A" => Key::A,
            "d" | "D" => Key::D,
            " " => Key::Space,
            "p" | "P" => Key::P,
            "f" | "F" => Key::F,
            _ => Key::Other,
        }
    }

    /// Arrow key as a Snake direction
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::ArrowLeft => Some(Direction::Left),
            Key::ArrowRight => Some(Direction::Right),
            Key::ArrowUp => Some(Direction::Up),
            Key::ArrowDown => Some(Direction::Down),
            _ => None,
        }
    }

    /// Keys whose default browser action (scrolling) should be suppressed
    pub fn captures_default(&self) -> bool {
        matches!(
            self,
            Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown | Key::Space
        )
    }
}

/// On-screen hold button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One raw input occurrence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    /// Pointer pressed at playfield x (CSS px)
    PointerDown { x: f32 },
    PointerMove { x: f32 },
    /// Pointer released or cancelled
    PointerUp,
    /// Touch button pressed or released
    TouchHold { side: Side, held: bool },
    /// Snake D-pad tap
    Steer(Direction),
    /// Pause button
    TogglePause,
}

/// FIFO of input events awaiting the next tick
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Take every queued event in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Held paddle controls that persist across ticks
#[derive(Debug, Clone, Default)]
pub struct PaddleControls {
    pub key_left: bool,
    pub key_right: bool,
    pub touch_left: bool,
    pub touch_right: bool,
    /// Pointer x minus paddle x while a drag is active
    pub drag_offset: Option<f32>,
}

impl PaddleControls {
    pub fn left(&self) -> bool {
        self.key_left || self.touch_left
    }

    pub fn right(&self) -> bool {
        self.key_right || self.touch_right
    }

    /// Release everything (screen change, blur)
    pub fn release(&mut self) {
        *self = Self::default();
    }
}
