//! Host frame loop as an explicit start/stop/tick state machine.

use crate::{
    EngineConfig, FrameTime, HighlightSet, Playback, SequencerEngine, SkipReason, TickOutcome,
    TrackId, TrackStore,
};

/// Handle for a pending "call me before the next repaint" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Host primitive that delivers frame callbacks.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Scheduler that only records requests; the caller delivers the frames.
#[derive(Debug, Default, Clone)]
pub struct ManualFrameScheduler {
    next_id: u64,
    pending: Option<FrameRequest>,
    cancelled: Vec<FrameRequest>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the next frame should be delivered for, if any.
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn cancelled(&self) -> &[FrameRequest] {
        &self.cancelled
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
        self.cancelled.push(request);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running { pending: FrameRequest },
}

/// What a delivered frame did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverStep {
    Skipped(SkipReason),
    Advanced { triggered: Vec<TrackId> },
}

/// Owns the engine and the highlight set for one playback session.
///
/// Highlight expiry only happens when the host calls
/// [`FrameDriver::pump_timers`] from its own delayed-execution primitive.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    state: DriverState,
    engine: SequencerEngine,
    highlight: HighlightSet,
}

impl FrameDriver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: DriverState::Idle,
            engine: SequencerEngine::new(config),
            highlight: HighlightSet::new(config.highlight_window_ms),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. })
    }

    pub fn highlight(&self) -> &HighlightSet {
        &self.highlight
    }

    /// Idle → Running. The first delivered frame only sets the timing baseline.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.is_running() {
            return;
        }
        self.engine.reset();
        let pending = scheduler.request_frame();
        tracing::debug!(request = pending.0, "frame driver started");
        self.state = DriverState::Running { pending };
    }

    /// Running → Idle, cancelling the outstanding frame request. Highlight
    /// expiries already scheduled still run through [`FrameDriver::pump_timers`].
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let DriverState::Running { pending } = self.state {
            scheduler.cancel_frame(pending);
            tracing::debug!(request = pending.0, "frame driver stopped");
        }
        self.state = DriverState::Idle;
    }

    /// Frame callback for `request`. Stale callbacks (driver idle, or a
    /// request that is no longer the pending one) are ignored and return `None`.
    pub fn on_frame(
        &mut self,
        request: FrameRequest,
        frame: FrameTime,
        store: &mut dyn TrackStore,
        playback: Option<&mut dyn Playback>,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<DriverStep> {
        match self.state {
            DriverState::Running { pending } if pending == request => {}
            _ => return None,
        }

        let step = match self.engine.tick(frame, store.tracks(), playback) {
            TickOutcome::Skipped(reason) => DriverStep::Skipped(reason),
            TickOutcome::Advanced(update) => {
                store.replace_all(update.tracks);
                self.highlight.publish(&update.triggered, frame.phase_ms);
                DriverStep::Advanced {
                    triggered: update.triggered,
                }
            }
        };

        self.state = DriverState::Running {
            pending: scheduler.request_frame(),
        };
        Some(step)
    }

    /// Runs highlight expiries due at `now_ms` on the phase clock.
    pub fn pump_timers(&mut self, now_ms: f64) {
        self.highlight.expire(now_ms);
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingPlayback, Sample, Track, TrackBank};

    fn bank() -> TrackBank {
        let mut a = Track::new(1, Sample::Kick).oscillating();
        a.volume = -2.0;
        let b = Track::new(2, Sample::Snare).oscillating();
        TrackBank::new(vec![a, b])
    }

    fn deliver(
        driver: &mut FrameDriver,
        scheduler: &mut ManualFrameScheduler,
        bank: &mut TrackBank,
        playback: &mut RecordingPlayback,
        ms: f64,
    ) -> Option<DriverStep> {
        let request = scheduler.pending()?;
        driver.on_frame(request, FrameTime::at(ms), bank, Some(playback), scheduler)
    }

    #[test]
    fn start_requests_a_frame_and_stop_cancels_it() {
        let mut driver = FrameDriver::default();
        let mut scheduler = ManualFrameScheduler::new();

        driver.start(&mut scheduler);
        let pending = scheduler.pending().expect("start should request a frame");
        assert_eq!(driver.state(), DriverState::Running { pending });

        driver.stop(&mut scheduler);
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(scheduler.pending(), None);
        assert_eq!(scheduler.cancelled(), &[pending]);
    }

    #[test]
    fn frames_reschedule_and_update_the_store() {
        let mut driver = FrameDriver::default();
        let mut scheduler = ManualFrameScheduler::new();
        let mut bank = bank();
        let mut playback = RecordingPlayback::new();

        driver.start(&mut scheduler);
        let first = deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 0.0);
        assert_eq!(first, Some(DriverStep::Skipped(SkipReason::Baseline)));

        let second = deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 16.67);
        assert_eq!(
            second,
            Some(DriverStep::Advanced {
                triggered: vec![1, 2]
            })
        );
        assert!(bank.get(1).unwrap().position > 0.0);
        assert_eq!(playback.requests().len(), 2);
        assert!(driver.highlight().contains(1));
        assert!(scheduler.pending().is_some());
    }

    #[test]
    fn highlight_batch_clears_after_the_window() {
        let mut driver = FrameDriver::default();
        let mut scheduler = ManualFrameScheduler::new();
        let mut bank = bank();
        let mut playback = RecordingPlayback::new();

        driver.start(&mut scheduler);
        deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 0.0);
        deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 16.67);

        driver.pump_timers(100.0);
        assert_eq!(driver.highlight().ids(), &[1, 2]);
        driver.pump_timers(16.67 + 150.0);
        assert!(driver.highlight().ids().is_empty());
    }

    #[test]
    fn stale_callbacks_are_ignored() {
        let mut driver = FrameDriver::default();
        let mut scheduler = ManualFrameScheduler::new();
        let mut bank = bank();
        let before = bank.clone();

        driver.start(&mut scheduler);
        let request = scheduler.pending().unwrap();
        driver.stop(&mut scheduler);

        let step = driver.on_frame(request, FrameTime::at(0.0), &mut bank, None, &mut scheduler);
        assert_eq!(step, None);
        assert_eq!(bank, before);
        assert_eq!(scheduler.pending(), None);

        driver.start(&mut scheduler);
        let step = driver.on_frame(request, FrameTime::at(5.0), &mut bank, None, &mut scheduler);
        assert_eq!(step, None);
    }

    #[test]
    fn expiry_after_stop_is_harmless() {
        let mut driver = FrameDriver::default();
        let mut scheduler = ManualFrameScheduler::new();
        let mut bank = bank();
        let mut playback = RecordingPlayback::new();

        driver.start(&mut scheduler);
        deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 0.0);
        deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 16.67);
        driver.stop(&mut scheduler);

        driver.pump_timers(1_000.0);
        driver.pump_timers(2_000.0);
        assert!(driver.highlight().ids().is_empty());
    }

    #[test]
    fn restart_skips_the_first_frame_again() {
        let mut driver = FrameDriver::default();
        let mut scheduler = ManualFrameScheduler::new();
        let mut bank = bank();
        let mut playback = RecordingPlayback::new();

        driver.start(&mut scheduler);
        deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 0.0);
        deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 16.67);
        driver.stop(&mut scheduler);

        driver.start(&mut scheduler);
        let step = deliver(&mut driver, &mut scheduler, &mut bank, &mut playback, 9_000.0);
        assert_eq!(step, Some(DriverStep::Skipped(SkipReason::Baseline)));
    }
}
