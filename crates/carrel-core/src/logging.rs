//! Logging facilities for Carrel.
//!
//! Carrel uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("carrel::controller=debug,carrel_core::timer=trace")
//!     .init();
//! ```
//!
//! Every subsystem logs under its own target (see [`targets`]) so hosts can
//! filter the controller's state transitions separately from timer noise.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "carrel_core";
    /// Timer system target.
    pub const TIMER: &str = "carrel_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "carrel_core::signal";
    /// Record normalization target.
    pub const NORMALIZE: &str = "carrel::normalize";
    /// Card rendering and image resolution target.
    pub const RENDER: &str = "carrel::render";
    /// Presentation controller state machine target.
    pub const CONTROLLER: &str = "carrel::controller";
    /// Layout adapter target.
    pub const LAYOUT: &str = "carrel::layout";
    /// Settings loading target.
    pub const SETTINGS: &str = "carrel::settings";
    /// Performance spans target.
    pub const PERF: &str = "carrel::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for measuring how long frame construction or normalization takes.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "carrel::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// Thin wrappers around the `tracing` macros with the core target.
#[macro_export]
macro_rules! carrel_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "carrel_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! carrel_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "carrel_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! carrel_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "carrel_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! carrel_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "carrel_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! carrel_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "carrel_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_macros_log_under_core_target() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::TRACE)
                .finish(),
        );
        let timers = 3;
        crate::carrel_trace!(timers, "trace");
        crate::carrel_debug!("debug");
        crate::carrel_info!(timers, "info");
        crate::carrel_warn!(reason = "clamped", "warn");
        crate::carrel_error!("error {}", timers);
    }

    #[test]
    fn test_targets_share_prefixes() {
        assert!(targets::TIMER.starts_with(targets::CORE));
        assert!(targets::CONTROLLER.starts_with("carrel::"));
    }
}
