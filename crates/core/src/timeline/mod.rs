/// A payload waiting for its due time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent<T> {
    pub due_ms: f64,
    pub payload: T,
}

/// Delayed-execution queue driven by an external clock.
///
/// Events never fire before their due time; they fire on the first
/// [`DelayQueue::drain_due`] call at or after it. Events scheduled for the same
/// instant fire in scheduling order.
#[derive(Debug, Clone)]
pub struct DelayQueue<T> {
    events: Vec<ScheduledEvent<T>>,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: T) {
        let due_ms = now_ms + delay_ms.max(0.0);
        let index = self.events.partition_point(|event| event.due_ms <= due_ms);
        self.events.insert(index, ScheduledEvent { due_ms, payload });
    }

    /// Removes and returns every payload due at `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let split = self.events.partition_point(|event| event.due_ms <= now_ms);
        self.events
            .drain(..split)
            .map(|event| event.payload)
            .collect()
    }

    pub fn next_due_ms(&self) -> Option<f64> {
        self.events.first().map(|event| event.due_ms)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_no_sooner_than_the_delay() {
        let mut queue = DelayQueue::new();
        queue.schedule(100.0, 150.0, "a");

        assert!(queue.drain_due(249.0).is_empty());
        assert_eq!(queue.drain_due(250.0), vec!["a"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn drains_in_due_order() {
        let mut queue = DelayQueue::new();
        queue.schedule(0.0, 30.0, 3);
        queue.schedule(0.0, 10.0, 1);
        queue.schedule(0.0, 10.0, 2);
        queue.schedule(0.0, 99.0, 4);

        assert_eq!(queue.next_due_ms(), Some(10.0));
        assert_eq!(queue.drain_due(50.0), vec![1, 2, 3]);
        assert_eq!(queue.len(), 1);
    }
}
