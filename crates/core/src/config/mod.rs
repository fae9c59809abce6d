use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{track::default_tracks, PendulumError, Result, Track};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub simulation: SimulationConfig,
    pub tracks: Vec<Track>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            simulation: SimulationConfig::default(),
            tracks: default_tracks(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.simulation.validate()
    }
}

/// Tuning constants of the oscillation and trigger engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier turning `speed * time_factor` into an angular frequency.
    pub frequency_constant: f64,
    /// Frame duration (ms) that yields a time factor of exactly one.
    pub baseline_frame_ms: f64,
    /// Upper bound on the frame delta fed to the integrator.
    pub max_frame_delta_ms: f64,
    /// How long a triggered track stays highlighted.
    pub highlight_window_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frequency_constant: 0.005,
            baseline_frame_ms: 16.67,
            max_frame_delta_ms: 50.0,
            highlight_window_ms: 150.0,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.frequency_constant) {
            return Err(PendulumError::InvalidConfig(
                "frequency_constant must be a positive number",
            ));
        }
        if !is_positive(self.baseline_frame_ms) {
            return Err(PendulumError::InvalidConfig(
                "baseline_frame_ms must be a positive number",
            ));
        }
        if !is_positive(self.max_frame_delta_ms) {
            return Err(PendulumError::InvalidConfig(
                "max_frame_delta_ms must be a positive number",
            ));
        }
        if !is_positive(self.highlight_window_ms) {
            return Err(PendulumError::InvalidConfig(
                "highlight_window_ms must be a positive number",
            ));
        }
        Ok(())
    }
}

/// Parameters of the headless frame simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub fps: f64,
    pub duration_ms: f64,
    /// Phase clock reading at the first simulated frame.
    pub start_ms: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            duration_ms: 2_000.0,
            start_ms: 0.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.fps) {
            return Err(PendulumError::InvalidConfig("fps must be a positive number"));
        }
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(PendulumError::InvalidConfig(
                "duration_ms must be a non-negative number",
            ));
        }
        if !self.start_ms.is_finite() {
            return Err(PendulumError::InvalidConfig("start_ms must be finite"));
        }
        Ok(())
    }

    pub fn frame_interval_ms(&self) -> f64 {
        1_000.0 / self.fps
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
