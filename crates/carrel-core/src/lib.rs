//! Core systems for Carrel.
//!
//! This crate provides the host-facing capabilities the collection viewer is
//! built on:
//!
//! - **Clock**: an injectable source of "now" ([`SystemClock`], [`ManualClock`])
//! - **Timers**: one-shot and repeating timers measured against a clock
//! - **Signal/Slot System**: callbacks for item activation and "view all"
//! - **Logging**: `tracing` targets and helpers
//!
//! # Timer Example
//!
//! ```
//! use carrel_core::{ManualClock, TimerManager};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let mut timers = TimerManager::with_clock(clock.clone());
//!
//! let tick = timers.start_repeating(Duration::from_millis(3000));
//! clock.advance(Duration::from_millis(3000));
//! assert_eq!(timers.process_expired(), vec![tick]);
//!
//! timers.stop(tick).unwrap();
//! assert_eq!(timers.active_count(), 0);
//! ```
//!
//! # Signal Example
//!
//! ```
//! use carrel_core::Signal;
//!
//! let clicked = Signal::<String>::new();
//! clicked.connect(|id| println!("card {id} activated"));
//! clicked.emit("course-42".to_string());
//! ```

mod clock;
mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result, SignalError, TimerError};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{TimerId, TimerKind, TimerManager};

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(TimerManager: Send);
static_assertions::assert_impl_all!(ManualClock: Send, Sync);
