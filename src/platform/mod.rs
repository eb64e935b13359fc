//! Platform abstraction layer
//!
//! Handles browser/native differences for the monotonic clock and for
//! seeding per-session RNGs.

/// Monotonic milliseconds (`performance.now()` on the web)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// A fresh seed for a new session
pub fn session_seed() -> u64 {
    rand::random()
}
