// SPDX-License-Identifier: MIT OR Apache-2.0
//! The region playback state machine.
//!
//! A [`RegionSequencer`] walks an ordered region list, holding each
//! region's offsets for its duration before advancing, and reports a
//! single [`SequencerEvent::Finished`] when the last hold expires.
//!
//! There are no timer callbacks: the sequencer stores at most one
//! deadline and is polled with [`tick`](RegionSequencer::tick). `stop`
//! and a fresh `start` clear or replace that deadline synchronously, so
//! a cancelled hold can never advance state later.

use crate::region::{Offsets, Region};
use std::time::Instant;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerState {
    /// No playback in progress
    #[default]
    Idle,
    /// Holding the region at `index`
    Playing {
        /// Index of the active region
        index: usize,
    },
    /// The last region's hold expired naturally
    Finished,
}

/// Events reported by the sequencer, drained via
/// [`RegionSequencer::take_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Playback advanced to the region at `index`
    Advanced {
        /// Index of the newly active region
        index: usize,
    },
    /// The last region's hold expired; reported once per playback run
    Finished,
}

/// Walks a region list, applying one region's offsets at a time.
///
/// The sequencer is the sole owner of the current offsets; renderers only
/// read them. Everything runs on the caller's thread, driven by `tick`.
#[derive(Debug, Default)]
pub struct RegionSequencer {
    regions: Vec<Region>,
    state: SequencerState,
    current: Option<Offsets>,
    deadline: Option<Instant>,
    pending_events: Vec<SequencerEvent>,
}

impl RegionSequencer {
    /// Create a sequencer over a region list
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions,
            state: SequencerState::Idle,
            current: None,
            deadline: None,
            pending_events: Vec::new(),
        }
    }

    /// Begin playback from the first region.
    ///
    /// Any in-flight hold is cancelled first, along with undrained events
    /// from the aborted run. With an empty region list this is a no-op:
    /// the sequencer stays in its current state and never reports
    /// `Finished`.
    pub fn start(&mut self, now: Instant) {
        if self.regions.is_empty() {
            tracing::debug!("start requested with empty region list, ignoring");
            return;
        }

        self.deadline = None;
        self.pending_events.clear();

        let first = &self.regions[0];
        self.current = Some(first.offsets);
        self.deadline = Some(now + first.duration());
        self.state = SequencerState::Playing { index: 0 };
        tracing::debug!(regions = self.regions.len(), "playback started");
    }

    /// Advance playback past any expired hold.
    ///
    /// Call once per frame with the current instant. When a hold expires
    /// the next region's offsets are applied and its deadline is set from
    /// `now`, so every region is held for at least its full duration even
    /// when ticks arrive late. After the last region's hold expires the
    /// sequencer enters [`SequencerState::Finished`] and reports
    /// [`SequencerEvent::Finished`] exactly once.
    pub fn tick(&mut self, now: Instant) {
        loop {
            let SequencerState::Playing { index } = self.state else {
                return;
            };
            let Some(deadline) = self.deadline else {
                return;
            };
            if now < deadline {
                return;
            }

            let next = index + 1;
            if next < self.regions.len() {
                let region = &self.regions[next];
                self.current = Some(region.offsets);
                self.deadline = Some(now + region.duration());
                self.state = SequencerState::Playing { index: next };
                self.pending_events.push(SequencerEvent::Advanced { index: next });
                tracing::debug!(index = next, "advanced to next region");
            } else {
                self.deadline = None;
                self.state = SequencerState::Finished;
                self.pending_events.push(SequencerEvent::Finished);
                tracing::debug!("playback finished");
                return;
            }
        }
    }

    /// Cancel playback.
    ///
    /// Clears the pending hold and returns to idle. The current offsets
    /// are left as the last applied region so it stays visible. Safe to
    /// call from any state, including repeatedly; never reports
    /// `Finished`.
    pub fn stop(&mut self) {
        if self.deadline.is_some() || self.state != SequencerState::Idle {
            tracing::debug!("playback stopped");
        }
        self.deadline = None;
        self.state = SequencerState::Idle;
    }

    /// Replace the region list.
    ///
    /// An in-flight hold and the current offsets are not affected; the
    /// new list takes effect on the next [`start`](Self::start).
    pub fn update_regions(&mut self, regions: Vec<Region>) {
        self.regions = regions;
    }

    /// Drain pending events in the order they occurred
    pub fn take_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Current playback state
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Whether a hold is in progress
    pub fn is_playing(&self) -> bool {
        matches!(self.state, SequencerState::Playing { .. })
    }

    /// Whether the last run completed naturally
    pub fn is_finished(&self) -> bool {
        self.state == SequencerState::Finished
    }

    /// Offsets of the most recently applied region, if any region has
    /// ever been applied
    pub fn current_offsets(&self) -> Option<Offsets> {
        self.current
    }

    /// Index of the active region while playing
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SequencerState::Playing { index } => Some(index),
            SequencerState::Idle | SequencerState::Finished => None,
        }
    }

    /// The stored region list
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Expiry of the in-flight hold, for render scheduling
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::region::RegionId;
    use std::time::Duration;

    fn region(top: f32, right: f32, bottom: f32, left: f32, duration_ms: u64) -> Region {
        Region::new(Offsets::new(top, right, bottom, left), duration_ms)
    }

    #[test]
    fn test_start_applies_first_region() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![region(10.0, 20.0, 30.0, 15.0, 1000)]);

        seq.start(clock.now());
        assert_eq!(seq.state(), SequencerState::Playing { index: 0 });
        assert_eq!(
            seq.current_offsets(),
            Some(Offsets::new(10.0, 20.0, 30.0, 15.0))
        );
        assert!(seq.next_deadline().is_some());
    }

    #[test]
    fn test_single_region_finishes_once() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![region(10.0, 20.0, 30.0, 15.0, 1000)]);

        seq.start(clock.now());
        clock.advance(Duration::from_millis(999));
        seq.tick(clock.now());
        assert!(seq.is_playing());
        assert!(seq.take_events().is_empty());

        clock.advance(Duration::from_millis(1));
        seq.tick(clock.now());
        assert!(seq.is_finished());
        assert_eq!(seq.take_events(), vec![SequencerEvent::Finished]);

        // Offsets stay at the last region and no further events appear.
        clock.advance(Duration::from_secs(10));
        seq.tick(clock.now());
        assert_eq!(
            seq.current_offsets(),
            Some(Offsets::new(10.0, 20.0, 30.0, 15.0))
        );
        assert!(seq.take_events().is_empty());
    }

    #[test]
    fn test_three_regions_two_advances() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![
            region(1.0, 1.0, 1.0, 1.0, 100),
            region(2.0, 2.0, 2.0, 2.0, 200),
            region(3.0, 3.0, 3.0, 3.0, 300),
        ]);

        seq.start(clock.now());
        let mut events = Vec::new();
        for _ in 0..3 {
            clock.advance(Duration::from_millis(300));
            seq.tick(clock.now());
            events.extend(seq.take_events());
        }

        assert_eq!(
            events,
            vec![
                SequencerEvent::Advanced { index: 1 },
                SequencerEvent::Advanced { index: 2 },
                SequencerEvent::Finished,
            ]
        );
        assert_eq!(seq.current_offsets(), Some(Offsets::new(3.0, 3.0, 3.0, 3.0)));
    }

    #[test]
    fn test_regions_held_full_duration_under_late_ticks() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![
            region(1.0, 0.0, 0.0, 0.0, 100),
            region(2.0, 0.0, 0.0, 0.0, 500),
        ]);

        seq.start(clock.now());
        // Tick arrives long after the first hold expired; the second
        // region's hold still runs its full 500ms from this tick.
        clock.advance(Duration::from_millis(400));
        seq.tick(clock.now());
        assert_eq!(seq.state(), SequencerState::Playing { index: 1 });

        clock.advance(Duration::from_millis(499));
        seq.tick(clock.now());
        assert!(seq.is_playing());

        clock.advance(Duration::from_millis(1));
        seq.tick(clock.now());
        assert!(seq.is_finished());
    }

    #[test]
    fn test_empty_list_start_is_noop() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(Vec::new());

        seq.start(clock.now());
        assert_eq!(seq.state(), SequencerState::Idle);
        assert_eq!(seq.current_offsets(), None);

        clock.advance(Duration::from_secs(5));
        seq.tick(clock.now());
        assert!(seq.take_events().is_empty());
    }

    #[test]
    fn test_stop_is_idempotent_and_silent() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![region(5.0, 5.0, 5.0, 5.0, 1000)]);

        // Stopping before any start is fine.
        seq.stop();
        seq.stop();
        assert_eq!(seq.state(), SequencerState::Idle);

        seq.start(clock.now());
        seq.stop();
        seq.stop();
        assert_eq!(seq.state(), SequencerState::Idle);
        assert!(seq.next_deadline().is_none());
        // The last applied region stays visible.
        assert_eq!(seq.current_offsets(), Some(Offsets::new(5.0, 5.0, 5.0, 5.0)));

        // A cancelled hold never expires.
        clock.advance(Duration::from_secs(10));
        seq.tick(clock.now());
        assert!(seq.take_events().is_empty());
        assert_eq!(seq.state(), SequencerState::Idle);
    }

    #[test]
    fn test_stop_after_finish() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![region(1.0, 1.0, 1.0, 1.0, 10)]);

        seq.start(clock.now());
        clock.advance(Duration::from_millis(10));
        seq.tick(clock.now());
        assert!(seq.is_finished());

        seq.stop();
        assert_eq!(seq.state(), SequencerState::Idle);
        // The naturally reported finish is still observable after stop.
        assert_eq!(seq.take_events(), vec![SequencerEvent::Finished]);
    }

    #[test]
    fn test_restart_cancels_in_flight_hold() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![
            region(1.0, 1.0, 1.0, 1.0, 100),
            region(2.0, 2.0, 2.0, 2.0, 100),
        ]);

        seq.start(clock.now());
        clock.advance(Duration::from_millis(100));
        seq.tick(clock.now());
        assert_eq!(seq.take_events(), vec![SequencerEvent::Advanced { index: 1 }]);

        // Restart mid-run: back to region 0 with a single fresh deadline.
        seq.start(clock.now());
        assert_eq!(seq.state(), SequencerState::Playing { index: 0 });
        assert_eq!(seq.current_offsets(), Some(Offsets::new(1.0, 1.0, 1.0, 1.0)));

        // Only the new run's events are observed from here on.
        clock.advance(Duration::from_millis(100));
        seq.tick(clock.now());
        clock.advance(Duration::from_millis(100));
        seq.tick(clock.now());
        assert_eq!(
            seq.take_events(),
            vec![SequencerEvent::Advanced { index: 1 }, SequencerEvent::Finished]
        );
    }

    #[test]
    fn test_restart_discards_undrained_events() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![
            region(1.0, 1.0, 1.0, 1.0, 100),
            region(2.0, 2.0, 2.0, 2.0, 100),
        ]);

        seq.start(clock.now());
        clock.advance(Duration::from_millis(100));
        seq.tick(clock.now());
        // Events from the aborted run are not drained before restart.
        seq.start(clock.now());
        assert!(seq.take_events().is_empty());
    }

    #[test]
    fn test_update_regions_stores_new_list() {
        let mut seq = RegionSequencer::new(Vec::new());
        let replacement = vec![region(5.0, 10.0, 15.0, 20.0, 2000)];
        seq.update_regions(replacement.clone());
        assert_eq!(seq.regions(), replacement.as_slice());
    }

    #[test]
    fn test_update_regions_does_not_disturb_playback() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![region(1.0, 1.0, 1.0, 1.0, 100)]);

        seq.start(clock.now());
        let deadline = seq.next_deadline();
        seq.update_regions(vec![region(9.0, 9.0, 9.0, 9.0, 900), region(8.0, 8.0, 8.0, 8.0, 800)]);

        // In-flight hold and offsets are untouched.
        assert_eq!(seq.next_deadline(), deadline);
        assert_eq!(seq.current_offsets(), Some(Offsets::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(seq.state(), SequencerState::Playing { index: 0 });

        // The old single-region run finishes on schedule.
        clock.advance(Duration::from_millis(100));
        seq.tick(clock.now());
        assert_eq!(seq.take_events(), vec![SequencerEvent::Finished]);

        // The replacement list is used by the next start.
        seq.start(clock.now());
        assert_eq!(seq.current_offsets(), Some(Offsets::new(9.0, 9.0, 9.0, 9.0)));
        assert_eq!(seq.regions().len(), 2);
    }

    #[test]
    fn test_zero_duration_regions_drain_in_order() {
        let clock = ManualClock::new();
        let mut seq = RegionSequencer::new(vec![
            region(1.0, 0.0, 0.0, 0.0, 0),
            region(2.0, 0.0, 0.0, 0.0, 0),
            region(3.0, 0.0, 0.0, 0.0, 0),
        ]);

        seq.start(clock.now());
        seq.tick(clock.now());
        assert!(seq.is_finished());
        assert_eq!(
            seq.take_events(),
            vec![
                SequencerEvent::Advanced { index: 1 },
                SequencerEvent::Advanced { index: 2 },
                SequencerEvent::Finished,
            ]
        );
        assert_eq!(seq.current_offsets(), Some(Offsets::new(3.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_region_ids_preserved() {
        let list = vec![region(1.0, 2.0, 3.0, 4.0, 50)];
        let id: RegionId = list[0].id;
        let seq = RegionSequencer::new(list);
        assert_eq!(seq.regions()[0].id, id);
    }
}
