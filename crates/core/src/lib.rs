//! Core library for the Pendulum sequencer.
//!
//! Every track is a node swinging back and forth across a centre line and
//! fires its sample whenever it crosses that line. The crate holds the
//! per-frame engine (position integrator, crossing detection, mute/solo
//! gating), the frame driver state machine that hosts call once per repaint,
//! and the transient highlight bookkeeping. Rendering and audio output stay
//! with the host behind the [`Playback`], [`FrameScheduler`] and
//! [`TrackStore`] traits.

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod oscillator;
pub mod playback;
pub mod sim;
pub mod timeline;
pub mod track;
pub mod trigger;

pub use config::{AppConfig, EngineConfig, SimulationConfig};
pub use driver::{
    DriverState, DriverStep, FrameDriver, FrameRequest, FrameScheduler, ManualFrameScheduler,
};
pub use engine::{FrameUpdate, SequencerEngine, SkipReason, TickOutcome};
pub use error::{PendulumError, Result};
pub use highlight::HighlightSet;
pub use oscillator::{FrameTime, Integrator};
pub use playback::{PlayRequest, Playback, RecordingPlayback, TracingPlayback};
pub use sim::{Simulation, SimulationReport, TriggerEvent};
pub use timeline::{DelayQueue, ScheduledEvent};
pub use track::{Direction, Sample, Track, TrackBank, TrackId, TrackParam, TrackStore};
pub use trigger::{crossed_zero, PositionMemory, SoloGate};
