//! Scroll geometry and the viewport probe capability.

use std::fmt;

use parking_lot::Mutex;

/// Scroll axis of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A snapshot of a scroll container's geometry along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current scroll offset.
    pub offset: f32,
    /// Total length of the scrolled content.
    pub content_extent: f32,
    /// Visible length of the container.
    pub viewport_extent: f32,
}

impl ScrollMetrics {
    /// Creates a snapshot.
    pub fn new(offset: f32, content_extent: f32, viewport_extent: f32) -> Self {
        Self {
            offset,
            content_extent,
            viewport_extent,
        }
    }

    /// The furthest reachable offset.
    pub fn max_offset(&self) -> f32 {
        (self.content_extent - self.viewport_extent).max(0.0)
    }

    /// Offset as a fraction of the scrollable extent, in `[0, 1]`.
    ///
    /// Content that does not overflow reports 0.
    pub fn fraction(&self) -> f32 {
        let max = self.max_offset();
        if max <= 0.0 {
            0.0
        } else {
            (self.offset / max).clamp(0.0, 1.0)
        }
    }
}

/// How a programmatic scroll should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Read and drive a host's scroll container.
///
/// This is the geometry half of the capability the controller is given; the
/// timing half is the clock its timer manager runs on.
pub trait ViewportProbe: Send + Sync {
    /// Current geometry along `axis`.
    fn scroll_metrics(&self, axis: Axis) -> ScrollMetrics;

    /// Scrolls to `offset` along `axis`.
    fn scroll_to(&self, axis: Axis, offset: f32, behavior: ScrollBehavior);
}

/// Scroll position as a fraction of the scrollable extent.
///
/// Converted to a percentage only at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ScrollPosition(f32);

impl ScrollPosition {
    /// The origin.
    pub const START: ScrollPosition = ScrollPosition(0.0);

    /// Creates a position, clamping into `[0, 1]`. NaN becomes 0.
    pub fn new(fraction: f32) -> Self {
        if fraction.is_nan() {
            Self(0.0)
        } else {
            Self(fraction.clamp(0.0, 1.0))
        }
    }

    /// The fraction in `[0, 1]`.
    pub fn fraction(self) -> f32 {
        self.0
    }

    /// Presentation form, e.g. `"37.5%"`.
    pub fn as_percent_string(self) -> String {
        let percent = (self.0 * 1000.0).round() / 10.0;
        format!("{percent}%")
    }

    /// Which of `count` equal buckets this position falls in.
    pub fn bucket(self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        ((self.0 * count as f32).floor() as usize).min(count - 1)
    }
}

impl From<ScrollMetrics> for ScrollPosition {
    fn from(metrics: ScrollMetrics) -> Self {
        ScrollPosition::new(metrics.fraction())
    }
}

/// A recorded programmatic scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub axis: Axis,
    pub offset: f32,
    pub behavior: ScrollBehavior,
}

/// An in-memory viewport for headless hosts and tests.
///
/// Programmatic scrolls land immediately, clamped to the scrollable extent.
/// Only the latest request is kept, so a long-running track does not grow
/// any history.
pub struct VirtualViewport {
    inner: Mutex<VirtualState>,
}

#[derive(Debug, Default)]
struct VirtualState {
    metrics: ScrollMetrics,
    last_request: Option<ScrollRequest>,
    request_count: u64,
}

impl VirtualViewport {
    /// Creates a viewport with the given content and visible extents.
    pub fn new(content_extent: f32, viewport_extent: f32) -> Self {
        Self {
            inner: Mutex::new(VirtualState {
                metrics: ScrollMetrics::new(0.0, content_extent, viewport_extent),
                last_request: None,
                request_count: 0,
            }),
        }
    }

    /// Current geometry.
    pub fn metrics(&self) -> ScrollMetrics {
        self.inner.lock().metrics
    }

    /// Moves the offset as a user scroll would, returning the new geometry.
    pub fn set_offset(&self, offset: f32) -> ScrollMetrics {
        let mut inner = self.inner.lock();
        inner.metrics.offset = offset.clamp(0.0, inner.metrics.max_offset());
        inner.metrics
    }

    /// Changes the content length, e.g. after more items were shown.
    pub fn set_content_extent(&self, extent: f32) {
        let mut inner = self.inner.lock();
        inner.metrics.content_extent = extent;
        let max = inner.metrics.max_offset();
        inner.metrics.offset = inner.metrics.offset.min(max);
    }

    /// The most recent programmatic scroll.
    pub fn last_request(&self) -> Option<ScrollRequest> {
        self.inner.lock().last_request
    }

    /// Number of programmatic scrolls so far.
    pub fn request_count(&self) -> u64 {
        self.inner.lock().request_count
    }
}

impl ViewportProbe for VirtualViewport {
    fn scroll_metrics(&self, _axis: Axis) -> ScrollMetrics {
        self.metrics()
    }

    fn scroll_to(&self, axis: Axis, offset: f32, behavior: ScrollBehavior) {
        let mut inner = self.inner.lock();
        inner.metrics.offset = offset.clamp(0.0, inner.metrics.max_offset());
        inner.last_request = Some(ScrollRequest {
            axis,
            offset,
            behavior,
        });
        inner.request_count += 1;
    }
}

impl fmt::Debug for VirtualViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("VirtualViewport")
            .field("metrics", &inner.metrics)
            .field("last_request", &inner.last_request)
            .field("request_count", &inner.request_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_fraction() {
        let metrics = ScrollMetrics::new(1050.0, 3000.0, 900.0);
        assert_eq!(metrics.max_offset(), 2100.0);
        assert_eq!(metrics.fraction(), 0.5);
        assert_eq!(ScrollMetrics::new(0.0, 500.0, 900.0).fraction(), 0.0);
    }

    #[test]
    fn test_position_presentation() {
        assert_eq!(ScrollPosition::new(0.375).as_percent_string(), "37.5%");
        assert_eq!(ScrollPosition::START.as_percent_string(), "0%");
        assert_eq!(ScrollPosition::new(2.0).fraction(), 1.0);
        assert_eq!(ScrollPosition::new(f32::NAN).fraction(), 0.0);
    }

    #[test]
    fn test_position_bucket() {
        assert_eq!(ScrollPosition::new(0.0).bucket(4), 0);
        assert_eq!(ScrollPosition::new(0.5).bucket(4), 2);
        assert_eq!(ScrollPosition::new(1.0).bucket(4), 3);
        assert_eq!(ScrollPosition::new(0.7).bucket(0), 0);
    }

    #[test]
    fn test_virtual_viewport_clamps_and_records() {
        let viewport = VirtualViewport::new(3000.0, 900.0);
        viewport.scroll_to(Axis::Horizontal, 5000.0, ScrollBehavior::Smooth);

        assert_eq!(viewport.metrics().offset, 2100.0);
        assert_eq!(
            viewport.last_request(),
            Some(ScrollRequest {
                axis: Axis::Horizontal,
                offset: 5000.0,
                behavior: ScrollBehavior::Smooth,
            })
        );
    }

    #[test]
    fn test_virtual_viewport_keeps_only_latest_request() {
        let viewport = VirtualViewport::new(3000.0, 900.0);
        for step in 0..10_000u32 {
            viewport.scroll_to(Axis::Vertical, (step % 7) as f32 * 200.0, ScrollBehavior::Smooth);
        }

        assert_eq!(viewport.request_count(), 10_000);
        assert_eq!(viewport.last_request().map(|r| r.offset), Some(600.0));
        assert_eq!(format!("{viewport:?}").matches("ScrollRequest").count(), 1);
    }
}
