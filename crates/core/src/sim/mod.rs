use serde::{Deserialize, Serialize};

use crate::{
    AppConfig, DriverStep, FrameDriver, FrameTime, ManualFrameScheduler, Playback,
    RecordingPlayback, Result, Sample, Track, TrackBank, TrackId, TrackStore,
};

/// One audible trigger observed during a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub time_ms: f64,
    pub track_id: TrackId,
    pub sample: Sample,
    pub volume_db: f64,
    pub duration_seconds: f64,
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub frames: usize,
    pub events: Vec<TriggerEvent>,
    pub tracks: Vec<Track>,
}

impl SimulationReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn events_for(&self, id: TrackId) -> impl Iterator<Item = &TriggerEvent> {
        self.events.iter().filter(move |event| event.track_id == id)
    }
}

/// Drives a [`FrameDriver`] from a virtual clock at a fixed frame rate.
#[derive(Debug)]
pub struct Simulation {
    config: AppConfig,
}

impl Simulation {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs the configured duration, forwarding every play call to `sink`.
    pub fn run(&self, sink: &mut dyn Playback) -> SimulationReport {
        let settings = self.config.simulation;
        let interval = settings.frame_interval_ms();
        let mut driver = FrameDriver::new(&self.config.engine);
        let mut scheduler = ManualFrameScheduler::new();
        let mut bank = TrackBank::new(self.config.tracks.clone());
        let mut recorder = RecordingPlayback::new();
        let mut events = Vec::new();
        let mut frames = 0;

        driver.start(&mut scheduler);
        tracing::info!(
            fps = settings.fps,
            duration_ms = settings.duration_ms,
            tracks = bank.len(),
            "starting simulation"
        );

        while let Some(request) = scheduler.pending() {
            let elapsed = frames as f64 * interval;
            if elapsed > settings.duration_ms {
                break;
            }
            let now = settings.start_ms + elapsed;
            frames += 1;

            let step = driver.on_frame(
                request,
                FrameTime::new(elapsed, now),
                &mut bank,
                Some(&mut recorder),
                &mut scheduler,
            );

            if let Some(DriverStep::Advanced { triggered }) = step {
                for (track_id, request) in triggered.into_iter().zip(recorder.take()) {
                    sink.play(request.sample, request.duration_seconds, request.volume_db);
                    events.push(TriggerEvent {
                        time_ms: now,
                        track_id,
                        sample: request.sample,
                        volume_db: request.volume_db,
                        duration_seconds: request.duration_seconds,
                    });
                }
            }
            driver.pump_timers(now);
        }

        driver.stop(&mut scheduler);
        tracing::info!(frames, triggers = events.len(), "simulation finished");

        SimulationReport {
            frames,
            events,
            tracks: bank.tracks().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulationConfig;

    fn config(tracks: Vec<Track>) -> AppConfig {
        AppConfig {
            simulation: SimulationConfig {
                fps: 50.0,
                duration_ms: 1_000.0,
                start_ms: 0.0,
            },
            tracks,
            ..AppConfig::default()
        }
    }

    #[test]
    fn counts_frames_for_the_duration() {
        let simulation = Simulation::new(config(Vec::new())).unwrap();
        let report = simulation.run(&mut RecordingPlayback::new());
        assert_eq!(report.frames, 51);
        assert!(report.events.is_empty());
    }

    #[test]
    fn records_triggers_and_forwards_them() {
        let tracks = vec![
            Track::new(1, Sample::Kick).oscillating(),
            Track::new(2, Sample::Clap),
        ];
        let simulation = Simulation::new(config(tracks)).unwrap();
        let mut sink = RecordingPlayback::new();
        let report = simulation.run(&mut sink);

        assert!(!report.events.is_empty());
        assert_eq!(sink.requests().len(), report.events.len());
        assert_eq!(report.events_for(2).count(), 0);
        assert!(report.events_for(1).all(|event| event.sample == Sample::Kick));

        let kick = &report.tracks[0];
        assert_eq!(
            kick.last_trigger_time,
            report.events_for(1).last().map(|event| event.time_ms)
        );
    }

    #[test]
    fn muted_tracks_stay_out_of_the_report() {
        let mut muted = Track::new(1, Sample::Tom).oscillating();
        muted.muted = true;
        let simulation = Simulation::new(config(vec![muted])).unwrap();
        let report = simulation.run(&mut RecordingPlayback::new());
        assert!(report.events.is_empty());
        assert!(report.tracks[0].last_trigger_time.is_none());
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut bad = config(Vec::new());
        bad.simulation.fps = 0.0;
        assert!(Simulation::new(bad).is_err());
    }

    #[test]
    fn report_serialises_to_json() {
        let simulation = Simulation::new(config(vec![Track::new(1, Sample::Rim).oscillating()]))
            .unwrap();
        let json = simulation
            .run(&mut RecordingPlayback::new())
            .to_json_pretty()
            .unwrap();
        assert!(json.contains("\"rim\""));
    }
}
