//! Simulation clocks
//!
//! Two scheduling models share one frame callback:
//! - [`FrameClock`]: variable dt clamped to a maximum step (Breakout)
//! - [`IntervalTimer`]: fixed-period steps at a selectable interval (Snake)

/// Converts animation-frame timestamps into a bounded per-tick delta
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    /// Largest dt a single tick may see (seconds)
    max_step: f32,
}

impl FrameClock {
    pub fn new(max_step: f32) -> Self {
        Self {
            last_ms: None,
            max_step,
        }
    }

    /// Advance to `now_ms` and return the tick delta in seconds.
    ///
    /// The first call after construction or [`reset`](Self::reset) returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => (((now_ms - last) / 1000.0).max(0.0) as f32).min(self.max_step),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the last timestamp (call on pause/resume/launch)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Fixed-period step timer
///
/// Fires at most once per [`advance`](Self::advance) call. Time beyond one
/// period is dropped so a suspended tab never replays a burst of steps.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    elapsed_ms: f64,
    armed: bool,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            elapsed_ms: 0.0,
            armed: false,
        }
    }

    /// Start (or restart) the timer from zero
    pub fn arm(&mut self) {
        self.elapsed_ms = 0.0;
        self.armed = true;
    }

    /// Stop firing until re-armed
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Change the period; takes effect from the next step
    pub fn set_period(&mut self, period_ms: f64) {
        self.period_ms = period_ms.max(1.0);
    }

    /// Accumulate `dt_ms`; returns true when a step is due
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.period_ms {
            self.elapsed_ms = (self.elapsed_ms - self.period_ms) % self.period_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new(0.033);
        assert_eq!(clock.advance(1000.0), 0.0);
        let dt = clock.advance(1016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_dt_clamped() {
        let mut clock = FrameClock::new(0.033);
        clock.advance(0.0);
        // Tab was suspended for five seconds
        assert_eq!(clock.advance(5000.0), 0.033);
    }

    #[test]
    fn test_reset_gives_zero_dt() {
        let mut clock = FrameClock::new(0.033);
        clock.advance(0.0);
        clock.advance(16.0);
        clock.reset();
        assert_eq!(clock.advance(9000.0), 0.0);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new(0.033);
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), 0.0);
    }

    #[test]
    fn test_interval_fires_on_period() {
        let mut timer = IntervalTimer::new(100.0);
        assert!(!timer.advance(200.0), "unarmed timer never fires");

        timer.arm();
        assert!(!timer.advance(60.0));
        assert!(timer.advance(60.0));
        // 20ms carried over
        assert!(!timer.advance(60.0));
        assert!(timer.advance(30.0));
    }

    #[test]
    fn test_interval_no_burst_after_suspend() {
        let mut timer = IntervalTimer::new(100.0);
        timer.arm();
        assert!(timer.advance(10_000.0));
        assert!(!timer.advance(0.0));
    }

    #[test]
    fn test_interval_disarm() {
        let mut timer = IntervalTimer::new(100.0);
        timer.arm();
        timer.disarm();
        assert!(!timer.advance(500.0));
        timer.arm();
        assert!(timer.advance(100.0));
    }
}
