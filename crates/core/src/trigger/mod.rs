//! Centre-crossing detection and mute/solo gating.

use std::collections::HashMap;

use crate::{Track, TrackId};

/// Returns true when moving from `last` to `new` crosses (or leaves) zero.
///
/// Leaving exactly zero in either direction counts, arriving at zero does not.
pub fn crossed_zero(last: f64, new: f64) -> bool {
    (last <= 0.0 && new > 0.0) || (last >= 0.0 && new < 0.0)
}

/// Mute/solo decision for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoloGate {
    solo_active: bool,
}

impl SoloGate {
    /// Evaluates solo mode over the entire collection.
    pub fn from_tracks(tracks: &[Track]) -> Self {
        Self {
            solo_active: tracks.iter().any(|track| track.soloed),
        }
    }

    pub fn solo_active(&self) -> bool {
        self.solo_active
    }

    pub fn is_audible(&self, track: &Track) -> bool {
        !track.muted && (!self.solo_active || track.soloed)
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    position: f64,
    live: bool,
}

/// Last evaluated position per track.
///
/// Entries of tracks that stop oscillating go dormant and are reseeded from the
/// track's current position when it resumes, so a stale value never produces a
/// crossing on the resume frame.
#[derive(Debug, Clone, Default)]
pub struct PositionMemory {
    slots: HashMap<TrackId, Slot>,
}

impl PositionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous position for an oscillating track, seeding it when needed.
    pub fn last_position(&mut self, track: &Track) -> f64 {
        let slot = self.slots.entry(track.id).or_insert(Slot {
            position: track.position,
            live: true,
        });
        if !slot.live {
            *slot = Slot {
                position: track.position,
                live: true,
            };
        }
        slot.position
    }

    pub fn record(&mut self, id: TrackId, position: f64) {
        self.slots.insert(
            id,
            Slot {
                position,
                live: true,
            },
        );
    }

    /// Marks a track as not oscillating, keeping its stale entry dormant.
    pub fn park(&mut self, id: TrackId) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.live = false;
        }
    }

    /// Parks every entry, forcing all tracks to reseed.
    pub fn park_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.live = false;
        }
    }

    /// Drops entries of tracks that are no longer in the collection.
    pub fn retain_tracks(&mut self, tracks: &[Track]) {
        self.slots.retain(|id, _| tracks.iter().any(|track| track.id == *id));
    }

    /// Stored value regardless of whether the entry is dormant.
    pub fn stored(&self, id: TrackId) -> Option<f64> {
        self.slots.get(&id).map(|slot| slot.position)
    }

    pub fn is_live(&self, id: TrackId) -> bool {
        self.slots.get(&id).map(|slot| slot.live).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sample;

    fn track(id: TrackId) -> Track {
        Track::new(id, Sample::Snare)
    }

    #[test]
    fn crossing_is_symmetric() {
        assert!(crossed_zero(-1.0, 1.0));
        assert!(crossed_zero(1.0, -1.0));
    }

    #[test]
    fn leaving_zero_counts_arriving_does_not() {
        assert!(crossed_zero(0.0, 0.2));
        assert!(crossed_zero(0.0, -0.2));
        assert!(!crossed_zero(0.4, 0.0));
        assert!(!crossed_zero(-0.4, 0.0));
        assert!(!crossed_zero(0.0, 0.0));
    }

    #[test]
    fn same_sign_is_not_a_crossing() {
        assert!(!crossed_zero(0.3, 0.1));
        assert!(!crossed_zero(-0.3, -0.9));
    }

    #[test]
    fn solo_silences_everyone_else() {
        let mut a = track(1);
        a.soloed = true;
        let b = track(2);
        let gate = SoloGate::from_tracks(&[a.clone(), b.clone()]);

        assert!(gate.solo_active());
        assert!(gate.is_audible(&a));
        assert!(!gate.is_audible(&b));
    }

    #[test]
    fn mute_wins_over_solo() {
        let mut a = track(1);
        a.soloed = true;
        a.muted = true;
        let gate = SoloGate::from_tracks(std::slice::from_ref(&a));
        assert!(!gate.is_audible(&a));
    }

    #[test]
    fn without_solo_only_mute_matters() {
        let open = track(1);
        let mut muted = track(2);
        muted.muted = true;
        let gate = SoloGate::from_tracks(&[open.clone(), muted.clone()]);
        assert!(gate.is_audible(&open));
        assert!(!gate.is_audible(&muted));
    }

    #[test]
    fn seeds_from_current_position() {
        let mut memory = PositionMemory::new();
        let mut t = track(3);
        t.position = 0.25;
        assert_eq!(memory.last_position(&t), 0.25);
        assert!(memory.is_live(3));
    }

    #[test]
    fn reseeds_after_resume() {
        let mut memory = PositionMemory::new();
        let mut t = track(3);
        memory.record(3, -0.9);
        memory.park(3);
        assert_eq!(memory.stored(3), Some(-0.9));
        assert!(!memory.is_live(3));

        t.position = 0.4;
        assert_eq!(memory.last_position(&t), 0.4);
        assert!(memory.is_live(3));
    }

    #[test]
    fn retains_only_present_tracks() {
        let mut memory = PositionMemory::new();
        memory.record(1, 0.1);
        memory.record(2, -0.2);

        memory.retain_tracks(&[track(2)]);
        assert_eq!(memory.stored(1), None);
        assert_eq!(memory.stored(2), Some(-0.2));
    }
}
