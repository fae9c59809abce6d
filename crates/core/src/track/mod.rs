use serde::{Deserialize, Serialize};

use crate::{PendulumError, Result};

/// Stable identifier of a track for its whole lifetime.
pub type TrackId = u32;

const VOLUME_RANGE_DB: (f64, f64) = (-40.0, 0.0);
const SPEED_RANGE: (f64, f64) = (0.5, 4.0);
const DECAY_RANGE_SECONDS: (f64, f64) = (0.1, 2.0);

/// Which way a node swings first when it leaves the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    #[serde(rename = "left-to-right")]
    Forward,
    #[serde(rename = "right-to-left")]
    Reverse,
}

impl Direction {
    /// Sign applied to the oscillation waveform.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Drum kit voice a track fires. Forwarded verbatim to the playback backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sample {
    Kick,
    Snare,
    Hihat,
    Clap,
    Tom,
    Rim,
    Cowbell,
    Cymbal,
}

impl Sample {
    pub const ALL: [Sample; 8] = [
        Sample::Kick,
        Sample::Snare,
        Sample::Hihat,
        Sample::Clap,
        Sample::Tom,
        Sample::Rim,
        Sample::Cowbell,
        Sample::Cymbal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sample::Kick => "kick",
            Sample::Snare => "snare",
            Sample::Hihat => "hihat",
            Sample::Clap => "clap",
            Sample::Tom => "tom",
            Sample::Rim => "rim",
            Sample::Cowbell => "cowbell",
            Sample::Cymbal => "cymbal",
        }
    }
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single oscillating node and the sound it fires.
///
/// The engine only ever reads the configuration fields and rewrites
/// [`Track::position`] and [`Track::last_trigger_time`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    #[serde(default)]
    pub oscillating: bool,
    #[serde(default)]
    pub direction: Direction,
    pub speed: f64,
    pub amplitude: f64,
    /// Signed displacement from the centre line.
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub soloed: bool,
    pub sample: Sample,
    /// Gain in dB.
    pub volume: f64,
    /// Note duration in seconds.
    pub decay: f64,
    #[serde(default)]
    pub color: String,
    /// Phase clock reading (ms) of the most recent audible trigger.
    #[serde(default)]
    pub last_trigger_time: Option<f64>,
}

impl Track {
    /// Creates a stationary, centred track for the given voice.
    pub fn new(id: TrackId, sample: Sample) -> Self {
        Self {
            id,
            oscillating: false,
            direction: Direction::Forward,
            speed: 1.0,
            amplitude: 1.0,
            position: 0.0,
            muted: false,
            soloed: false,
            sample,
            volume: -10.0,
            decay: 0.5,
            color: String::new(),
            last_trigger_time: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn oscillating(mut self) -> Self {
        self.oscillating = true;
        self
    }
}

/// Single editable parameter, as exposed by the track controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackParam {
    Sample(Sample),
    Volume(f64),
    Speed(f64),
    Decay(f64),
    Amplitude(f64),
    Direction(Direction),
    Muted(bool),
    Soloed(bool),
    Oscillating(bool),
}

/// Owner of the track collection. The engine reads the full set and writes a
/// wholesale replacement once per frame.
pub trait TrackStore {
    fn tracks(&self) -> &[Track];
    fn replace_all(&mut self, tracks: Vec<Track>);
}

/// In-memory track collection with a single optional selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackBank {
    tracks: Vec<Track>,
    selected: Option<TrackId>,
}

impl TrackBank {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: None,
        }
    }

    /// Four-voice starter kit centred on the line; the clap starts idle.
    pub fn default_kit() -> Self {
        Self::new(default_tracks())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Result<&Track> {
        self.tracks
            .iter()
            .find(|track| track.id == id)
            .ok_or(PendulumError::UnknownTrack(id))
    }

    pub fn get_mut(&mut self, id: TrackId) -> Result<&mut Track> {
        self.tracks
            .iter_mut()
            .find(|track| track.id == id)
            .ok_or(PendulumError::UnknownTrack(id))
    }

    /// Applies a control change. Numeric values are clamped to the control's
    /// range; non-finite values leave the parameter untouched.
    pub fn set_param(&mut self, id: TrackId, param: TrackParam) -> Result<()> {
        let track = self.get_mut(id)?;
        match param {
            TrackParam::Sample(sample) => track.sample = sample,
            TrackParam::Volume(db) => set_clamped(&mut track.volume, db, VOLUME_RANGE_DB),
            TrackParam::Speed(speed) => set_clamped(&mut track.speed, speed, SPEED_RANGE),
            TrackParam::Decay(decay) => set_clamped(&mut track.decay, decay, DECAY_RANGE_SECONDS),
            TrackParam::Amplitude(amplitude) => {
                if amplitude.is_finite() {
                    track.amplitude = amplitude.max(0.0);
                }
            }
            TrackParam::Direction(direction) => track.direction = direction,
            TrackParam::Muted(muted) => track.muted = muted,
            TrackParam::Soloed(soloed) => track.soloed = soloed,
            TrackParam::Oscillating(oscillating) => track.oscillating = oscillating,
        }
        Ok(())
    }

    pub fn toggle_mute(&mut self, id: TrackId) -> Result<bool> {
        let track = self.get_mut(id)?;
        track.muted = !track.muted;
        Ok(track.muted)
    }

    pub fn toggle_solo(&mut self, id: TrackId) -> Result<bool> {
        let track = self.get_mut(id)?;
        track.soloed = !track.soloed;
        Ok(track.soloed)
    }

    pub fn toggle_oscillating(&mut self, id: TrackId) -> Result<bool> {
        let track = self.get_mut(id)?;
        track.oscillating = !track.oscillating;
        Ok(track.oscillating)
    }

    /// Selects `id`, or clears the selection when `id` is already selected.
    pub fn select_toggle(&mut self, id: TrackId) -> Result<Option<TrackId>> {
        self.get(id)?;
        self.selected = if self.selected == Some(id) {
            None
        } else {
            Some(id)
        };
        Ok(self.selected)
    }

    pub fn selected(&self) -> Option<&Track> {
        self.selected.and_then(|id| self.get(id).ok())
    }
}

impl TrackStore for TrackBank {
    fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn replace_all(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }
}

pub(crate) fn default_tracks() -> Vec<Track> {
    vec![
        Track::new(1, Sample::Kick)
            .with_color("#f97316")
            .oscillating(),
        Track::new(2, Sample::Snare)
            .with_color("#22d3ee")
            .with_speed(1.5)
            .oscillating(),
        Track::new(3, Sample::Hihat)
            .with_color("#a3e635")
            .with_speed(2.0)
            .with_direction(Direction::Reverse)
            .oscillating(),
        Track::new(4, Sample::Clap)
            .with_color("#e879f9")
            .with_speed(0.75),
    ]
}

fn set_clamped(slot: &mut f64, value: f64, (min, max): (f64, f64)) {
    if value.is_finite() {
        *slot = value.clamp(min, max);
    }
}
