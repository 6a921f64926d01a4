//! Timer system for Carrel.
//!
//! Provides one-shot and repeating timers measured against an injected
//! [`Clock`]. The manager never sleeps or spawns anything: the owning event
//! loop asks [`TimerManager::time_until_next`] how long it may wait and then
//! calls [`TimerManager::process_expired`] to collect the timers that fired.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// Handle to a pending timer.
    pub struct TimerId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    OneShot,
    /// Re-armed `interval` after each fire.
    Repeating,
}

#[derive(Debug)]
struct TimerData {
    next_fire: Instant,
    interval: Duration,
    kind: TimerKind,
}

/// Heap entry. Stale once its timer is stopped or re-armed.
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline on top.
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages the timers owned by one component.
pub struct TimerManager {
    clock: Arc<dyn Clock>,
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a timer manager driven by wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a timer manager driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// The clock this manager measures time against.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Arms a timer that fires once, `duration` from now.
    pub fn start_one_shot(&mut self, duration: Duration) -> TimerId {
        self.insert(duration, TimerKind::OneShot)
    }

    /// Arms a timer that fires every `interval`, first at now + `interval`.
    pub fn start_repeating(&mut self, interval: Duration) -> TimerId {
        self.insert(interval, TimerKind::Repeating)
    }

    fn insert(&mut self, interval: Duration, kind: TimerKind) -> TimerId {
        let next_fire = self.clock.now() + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
        });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?kind, ?interval, "timer armed");
        id
    }

    /// Cancels a pending timer.
    ///
    /// Fails with [`TimerError::InvalidTimerId`] if `id` already fired (one-shot)
    /// or was stopped.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            tracing::trace!(target: targets::TIMER, ?id, "timer cancelled");
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Stop every timer owned by this manager.
    pub fn stop_all(&mut self) {
        if !self.timers.is_empty() {
            tracing::trace!(target: targets::TIMER, count = self.timers.len(), "all timers cancelled");
        }
        self.timers.clear();
        self.queue.clear();
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// How long until the earliest pending deadline; `None` with nothing armed.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.discard_stale();
        let now = self.clock.now();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Pop queue entries whose timer was stopped, or that a reschedule superseded.
    fn discard_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            let live = self
                .timers
                .get(entry.id)
                .is_some_and(|t| t.next_fire == entry.fire_time);
            if live {
                break;
            }
            self.queue.pop();
        }
    }

    /// Collects every timer whose deadline has passed, earliest first.
    ///
    /// A repeating timer fires at most once per call and is re-armed at
    /// now + interval, so a host that fell behind does not get a burst.
    #[tracing::instrument(skip(self), target = "carrel_core::timer", level = "trace")]
    pub fn process_expired(&mut self) -> Vec<TimerId> {
        let now = self.clock.now();
        let mut fired = Vec::new();
        let mut rearmed = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get_mut(entry.id) else {
                continue;
            };
            if timer.next_fire != entry.fire_time {
                continue;
            }

            tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
            fired.push(entry.id);

            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(entry.id);
                }
                TimerKind::Repeating => {
                    timer.next_fire = now + timer.interval;
                    rearmed.push(TimerQueueEntry {
                        id: entry.id,
                        fire_time: timer.next_fire,
                    });
                }
            }
        }

        self.queue.extend(rearmed);
        fired
    }

    /// Number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerManager")
            .field("active", &self.timers.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manager() -> (Arc<ManualClock>, TimerManager) {
        let clock = Arc::new(ManualClock::new());
        let timers = TimerManager::with_clock(clock.clone());
        (clock, timers)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let (clock, mut timers) = manager();
        let id = timers.start_one_shot(Duration::from_millis(100));

        clock.advance(Duration::from_millis(99));
        assert!(timers.process_expired().is_empty());

        clock.advance(Duration::from_millis(1));
        assert_eq!(timers.process_expired(), vec![id]);
        assert!(!timers.is_active(id));

        clock.advance(Duration::from_millis(500));
        assert!(timers.process_expired().is_empty());
    }

    #[test]
    fn test_repeating_fires_every_interval() {
        let (clock, mut timers) = manager();
        let id = timers.start_repeating(Duration::from_millis(50));

        for _ in 0..3 {
            clock.advance(Duration::from_millis(50));
            assert_eq!(timers.process_expired(), vec![id]);
        }
        assert!(timers.is_active(id));
        assert_eq!(timers.active_count(), 1);
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let (clock, mut timers) = manager();
        let id = timers.start_one_shot(Duration::from_millis(10));
        timers.stop(id).unwrap();

        clock.advance(Duration::from_millis(20));
        assert!(timers.process_expired().is_empty());
        assert!(timers.stop(id).is_err());
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let (_clock, mut timers) = manager();
        let early = timers.start_one_shot(Duration::from_millis(10));
        timers.start_one_shot(Duration::from_millis(40));
        timers.stop(early).unwrap();

        assert_eq!(timers.time_until_next(), Some(Duration::from_millis(40)));
    }

    #[test]
    fn test_fire_order_follows_deadline() {
        let (clock, mut timers) = manager();
        let late = timers.start_one_shot(Duration::from_millis(30));
        let early = timers.start_one_shot(Duration::from_millis(10));

        clock.advance(Duration::from_millis(30));
        assert_eq!(timers.process_expired(), vec![early, late]);
    }

    #[test]
    fn test_stop_all_clears_everything() {
        let (_clock, mut timers) = manager();
        timers.start_one_shot(Duration::from_millis(10));
        timers.start_repeating(Duration::from_millis(10));
        assert_eq!(timers.active_count(), 2);

        timers.stop_all();
        assert_eq!(timers.active_count(), 0);
        assert_eq!(timers.time_until_next(), None);
    }

    #[test]
    fn test_zero_interval_fires_once_per_call() {
        let (_clock, mut timers) = manager();
        let id = timers.start_repeating(Duration::ZERO);

        assert_eq!(timers.process_expired(), vec![id]);
        assert_eq!(timers.process_expired(), vec![id]);
    }
}
