use serde::{Deserialize, Serialize};

use crate::Sample;

/// Sample playback backend. Calls are fire-and-forget.
pub trait Playback {
    fn play(&mut self, sample: Sample, duration_seconds: f64, volume_db: f64);
}

/// A single call made to a [`Playback`] backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayRequest {
    pub sample: Sample,
    pub duration_seconds: f64,
    pub volume_db: f64,
}

/// Backend that keeps every request it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingPlayback {
    requests: Vec<PlayRequest>,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[PlayRequest] {
        &self.requests
    }

    pub fn take(&mut self) -> Vec<PlayRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl Playback for RecordingPlayback {
    fn play(&mut self, sample: Sample, duration_seconds: f64, volume_db: f64) {
        self.requests.push(PlayRequest {
            sample,
            duration_seconds,
            volume_db,
        });
    }
}

/// Backend that only logs, for running without an audio device.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPlayback;

impl Playback for TracingPlayback {
    fn play(&mut self, sample: Sample, duration_seconds: f64, volume_db: f64) {
        tracing::info!(%sample, duration_seconds, volume_db, "play");
    }
}
