use crate::{
    crossed_zero, EngineConfig, FrameTime, Integrator, Playback, PositionMemory, SoloGate, Track,
    TrackId,
};

/// Why a frame produced no update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// First frame after (re)starting; only establishes the timing baseline.
    Baseline,
    /// The frame timestamp did not advance past the previous one.
    Stalled,
}

/// Result of advancing one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    /// Wholesale replacement for the track collection.
    pub tracks: Vec<Track>,
    /// Ids of tracks that fired audibly this frame, in collection order.
    pub triggered: Vec<TrackId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Skipped(SkipReason),
    Advanced(FrameUpdate),
}

impl TickOutcome {
    pub fn into_update(self) -> Option<FrameUpdate> {
        match self {
            TickOutcome::Advanced(update) => Some(update),
            TickOutcome::Skipped(_) => None,
        }
    }
}

/// Oscillation and trigger engine. Owns the timing baseline and the per-track
/// position memory used for crossing detection.
#[derive(Debug, Clone)]
pub struct SequencerEngine {
    integrator: Integrator,
    memory: PositionMemory,
    last_frame_ms: Option<f64>,
}

impl SequencerEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            integrator: Integrator::new(config),
            memory: PositionMemory::new(),
            last_frame_ms: None,
        }
    }

    /// Forgets the timing baseline and parks every remembered position, so the
    /// next frame is a baseline frame and every track reseeds.
    pub fn reset(&mut self) {
        self.last_frame_ms = None;
        self.memory.park_all();
    }

    pub fn memory(&self) -> &PositionMemory {
        &self.memory
    }

    pub fn last_frame_ms(&self) -> Option<f64> {
        self.last_frame_ms
    }

    /// Advances every oscillating track to `frame` and evaluates triggers.
    ///
    /// Audible triggers call `playback` (when present) with the track's sample,
    /// decay and volume. Non-oscillating tracks are passed through unchanged.
    pub fn tick(
        &mut self,
        frame: FrameTime,
        tracks: &[Track],
        mut playback: Option<&mut dyn Playback>,
    ) -> TickOutcome {
        let Some(last_frame_ms) = self.last_frame_ms else {
            if frame.frame_ms.is_finite() {
                self.last_frame_ms = Some(frame.frame_ms);
            }
            tracing::debug!(frame_ms = frame.frame_ms, "baseline frame");
            return TickOutcome::Skipped(SkipReason::Baseline);
        };

        let delta = frame.frame_ms - last_frame_ms;
        if !delta.is_finite() || delta <= 0.0 {
            tracing::debug!(frame_ms = frame.frame_ms, last_frame_ms, "stalled frame");
            return TickOutcome::Skipped(SkipReason::Stalled);
        }
        self.last_frame_ms = Some(frame.frame_ms);

        let time_factor = self.integrator.time_factor(delta);
        let gate = SoloGate::from_tracks(tracks);
        let mut triggered = Vec::new();
        self.memory.retain_tracks(tracks);

        let tracks = tracks
            .iter()
            .map(|track| {
                if !track.oscillating {
                    self.memory.park(track.id);
                    return track.clone();
                }

                let position = self.integrator.position(track, frame.phase_ms, time_factor);
                let last = self.memory.last_position(track);
                self.memory.record(track.id, position);

                let mut next = Track {
                    position,
                    ..track.clone()
                };

                if crossed_zero(last, position) && gate.is_audible(track) {
                    tracing::trace!(track = track.id, sample = %track.sample, "trigger");
                    if let Some(playback) = playback.as_deref_mut() {
                        playback.play(track.sample, track.decay, track.volume);
                    }
                    next.last_trigger_time = Some(frame.phase_ms);
                    triggered.push(track.id);
                }

                next
            })
            .collect();

        TickOutcome::Advanced(FrameUpdate { tracks, triggered })
    }
}

impl Default for SequencerEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
