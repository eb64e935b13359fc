//! Sound effects
//!
//! No audio files are bundled: every effect is a short generated tone played
//! through the Web Audio API. The mapping from game events to tones is plain
//! data so it can be tested natively.

use crate::sim::breakout::GameEvent;
use crate::sim::snake::StepOutcome;

/// Base gain for a tone before the sfx volume setting is applied
pub const TONE_GAIN: f32 = 0.04;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle or brick, snake eats
    Hit,
    /// Life lost
    Lose,
    /// Level cleared
    Win,
    /// Game over
    Death,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
}

/// A fixed-pitch tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub freq_hz: f32,
    pub duration_ms: f32,
    pub waveform: Waveform,
}

impl SoundEffect {
    pub fn tone(&self) -> ToneSpec {
        let (freq_hz, duration_ms, waveform) = match self {
            SoundEffect::Hit => (520.0, 70.0, Waveform::Square),
            SoundEffect::Lose => (160.0, 200.0, Waveform::Square),
            SoundEffect::Win => (660.0, 120.0, Waveform::Sawtooth),
            SoundEffect::Death => (110.0, 250.0, Waveform::Square),
        };
        ToneSpec {
            freq_hz,
            duration_ms,
            waveform,
        }
    }

    /// Sound for a Breakout event, if any
    pub fn for_breakout(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit | GameEvent::BrickHit { .. } => Some(SoundEffect::Hit),
            GameEvent::LifeLost { .. } => Some(SoundEffect::Lose),
            GameEvent::LevelCleared { .. } => Some(SoundEffect::Win),
            GameEvent::GameOver { .. } => Some(SoundEffect::Death),
            _ => None,
        }
    }

    /// Sound for a Snake step, if any
    pub fn for_snake(outcome: &StepOutcome) -> Option<Self> {
        match outcome {
            StepOutcome::Ate => Some(SoundEffect::Hit),
            StepOutcome::Collided(_) => Some(SoundEffect::Death),
            StepOutcome::BoardFilled => Some(SoundEffect::Win),
            StepOutcome::Moved => None,
        }
    }
}

/// Gain for a tone at the given sfx volume setting
pub fn tone_gain(sfx_volume: f32) -> f32 {
    TONE_GAIN * sfx_volume.clamp(0.0, 1.0)
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, ToneSpec, Waveform, tone_gain};

    /// Plays generated tones
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
    }

    impl AudioManager {
        pub fn new(sfx_volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, sfx_volume }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let gain = tone_gain(self.sfx_volume);
            if gain <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            play_tone(ctx, effect.tone(), gain);
        }
    }

    fn create_osc(ctx: &AudioContext, tone: &ToneSpec) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(match tone.waveform {
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        });
        osc.frequency().set_value(tone.freq_hz);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_tone(ctx: &AudioContext, tone: ToneSpec, level: f32) {
        let Some((osc, gain)) = create_osc(ctx, &tone) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value(level);
        osc.start().ok();
        osc.stop_with_when(t + f64::from(tone.duration_ms) / 1000.0).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::breakout::PowerUpKind;
    use crate::sim::snake::Collision;

    #[test]
    fn test_tones() {
        assert_eq!(SoundEffect::Hit.tone().freq_hz, 520.0);
        assert_eq!(SoundEffect::Hit.tone().duration_ms, 70.0);
        let win = SoundEffect::Win.tone();
        assert_eq!(win.waveform, Waveform::Sawtooth);
        assert_eq!(win.duration_ms, 120.0);
        assert_eq!(SoundEffect::Death.tone().freq_hz, 110.0);
    }

    #[test]
    fn test_breakout_mapping() {
        assert_eq!(
            SoundEffect::for_breakout(&GameEvent::BrickHit {
                destroyed: false,
                awarded: 3
            }),
            Some(SoundEffect::Hit)
        );
        assert_eq!(
            SoundEffect::for_breakout(&GameEvent::LifeLost { lives_left: 1 }),
            Some(SoundEffect::Lose)
        );
        assert_eq!(
            SoundEffect::for_breakout(&GameEvent::PowerUpCaught(PowerUpKind::Slow)),
            None
        );
    }

    #[test]
    fn test_snake_mapping() {
        assert_eq!(SoundEffect::for_snake(&StepOutcome::Moved), None);
        assert_eq!(
            SoundEffect::for_snake(&StepOutcome::Collided(Collision::Wall)),
            Some(SoundEffect::Death)
        );
    }

    #[test]
    fn test_gain_scales_with_setting() {
        assert!((tone_gain(0.7) - 0.028).abs() < 1e-6);
        assert_eq!(tone_gain(0.0), 0.0);
        assert_eq!(tone_gain(5.0), TONE_GAIN);
    }
}
