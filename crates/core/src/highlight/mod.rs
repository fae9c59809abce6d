use crate::{DelayQueue, TrackId};

/// Ids of recently triggered tracks, for the pulse animation.
///
/// Each published batch expires as a unit one highlight window later.
#[derive(Debug, Clone)]
pub struct HighlightSet {
    window_ms: f64,
    ids: Vec<TrackId>,
    expiries: DelayQueue<Vec<TrackId>>,
}

impl HighlightSet {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            ids: Vec::new(),
            expiries: DelayQueue::new(),
        }
    }

    /// Replaces the highlighted ids with this frame's batch and schedules its
    /// removal. Empty batches are ignored.
    pub fn publish(&mut self, batch: &[TrackId], now_ms: f64) {
        if batch.is_empty() {
            return;
        }
        self.ids = batch.to_vec();
        self.expiries.schedule(now_ms, self.window_ms, batch.to_vec());
    }

    /// Runs every expiry that is due. Removing absent ids is a no-op.
    pub fn expire(&mut self, now_ms: f64) {
        for batch in self.expiries.drain_due(now_ms) {
            self.ids.retain(|id| !batch.contains(id));
        }
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn pending(&self) -> usize {
        self.expiries.len()
    }
}
