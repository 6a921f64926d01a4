//! Integration tests for clock-driven timers.

use carrel_core::{ManualClock, TimerManager};
use std::sync::Arc;
use std::time::Duration;

fn setup() -> (Arc<ManualClock>, TimerManager) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("carrel_core=trace")
        .try_init();
    let clock = Arc::new(ManualClock::new());
    let timers = TimerManager::with_clock(clock.clone());
    (clock, timers)
}

#[test]
fn test_rearming_replaces_pending_timer() {
    let (clock, mut timers) = setup();

    // Re-arm pattern: cancel the previous instance, then start a new one.
    let first = timers.start_one_shot(Duration::from_millis(5000));
    clock.advance(Duration::from_millis(4000));
    timers.stop(first).unwrap();
    let second = timers.start_one_shot(Duration::from_millis(5000));

    clock.advance(Duration::from_millis(1000));
    assert!(timers.process_expired().is_empty());
    assert_eq!(timers.active_count(), 1);

    clock.advance(Duration::from_millis(4000));
    assert_eq!(timers.process_expired(), vec![second]);
    assert_eq!(timers.active_count(), 0);
}

#[test]
fn test_interleaved_repeating_and_one_shot() {
    let (clock, mut timers) = setup();
    let tick = timers.start_repeating(Duration::from_millis(3000));
    let reset = timers.start_one_shot(Duration::from_millis(5000));

    let mut fired = Vec::new();
    for _ in 0..7 {
        clock.advance(Duration::from_millis(1000));
        fired.extend(timers.process_expired());
    }

    assert_eq!(fired, vec![tick, reset, tick]);
    assert!(timers.is_active(tick));
    assert!(!timers.is_active(reset));
}

#[test]
fn test_time_until_next_tracks_clock() {
    let (clock, mut timers) = setup();
    timers.start_one_shot(Duration::from_millis(500));

    assert_eq!(timers.time_until_next(), Some(Duration::from_millis(500)));
    clock.advance(Duration::from_millis(200));
    assert_eq!(timers.time_until_next(), Some(Duration::from_millis(300)));
    clock.advance(Duration::from_millis(900));
    assert_eq!(timers.time_until_next(), Some(Duration::ZERO));
}
