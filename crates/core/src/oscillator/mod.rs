//! Frame-rate independent position integrator.

use crate::{EngineConfig, Track};

/// Timestamps delivered with a single frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Monotonic frame driver timestamp (ms), used for frame deltas.
    pub frame_ms: f64,
    /// Wall-clock phase reading (ms) shared by every track this frame.
    pub phase_ms: f64,
}

impl FrameTime {
    pub fn new(frame_ms: f64, phase_ms: f64) -> Self {
        Self { frame_ms, phase_ms }
    }

    /// Frame where the driver and the phase clock agree.
    pub fn at(ms: f64) -> Self {
        Self::new(ms, ms)
    }
}

/// Converts frame deltas into the normalised time factor.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    frequency_constant: f64,
    baseline_frame_ms: f64,
    max_frame_delta_ms: f64,
}

impl Integrator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            frequency_constant: config.frequency_constant,
            baseline_frame_ms: config.baseline_frame_ms,
            max_frame_delta_ms: config.max_frame_delta_ms,
        }
    }

    /// Time factor for a frame delta, where one baseline frame maps to 1.0.
    ///
    /// Long pauses are capped at the configured maximum and negative deltas
    /// count as no elapsed time.
    pub fn time_factor(&self, raw_delta_ms: f64) -> f64 {
        if !raw_delta_ms.is_finite() {
            return 0.0;
        }
        let capped = raw_delta_ms.max(0.0).min(self.max_frame_delta_ms);
        let factor = capped / self.baseline_frame_ms;
        if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            0.0
        }
    }

    /// New displacement for `track` at the given phase clock reading.
    pub fn position(&self, track: &Track, phase_ms: f64, time_factor: f64) -> f64 {
        let frequency = self.frequency_constant * track.speed * time_factor;
        let position = track.direction.sign() * track.amplitude * (phase_ms * frequency).sin();
        if position.is_finite() {
            position
        } else {
            tracing::warn!(
                track = track.id,
                speed = track.speed,
                amplitude = track.amplitude,
                "non-finite oscillator output, holding track at centre"
            );
            0.0
        }
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
