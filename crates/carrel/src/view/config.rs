//! Viewer configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use carrel_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::viewport::Axis;
use crate::delegate::{Category, ItemRenderer};
use crate::model::{ItemMapper, SourceRecord};

/// Callback invoked with the source record of an activated card.
pub type ItemClickCallback = Arc<dyn Fn(&SourceRecord) + Send + Sync>;

/// Callback invoked when "View All" is activated.
pub type ViewAllCallback = Arc<dyn Fn() + Send + Sync>;

/// How visible items are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Fixed column template with a manual "Load More".
    #[default]
    Grid,
    /// Single horizontally scrolling track.
    HorizontalScroll,
    /// Single vertically scrolling track.
    VerticalScroll,
}

impl LayoutMode {
    /// Returns `true` for the bounded-scroll layouts.
    pub fn is_scroll(self) -> bool {
        self.axis().is_some()
    }

    /// The scroll axis, if this is a scroll layout.
    pub fn axis(self) -> Option<Axis> {
        match self {
            LayoutMode::Grid => None,
            LayoutMode::HorizontalScroll => Some(Axis::Horizontal),
            LayoutMode::VerticalScroll => Some(Axis::Vertical),
        }
    }
}

/// What to show when there are no items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyState {
    pub title: String,
    pub message: Option<String>,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            title: "Nothing to show yet".to_string(),
            message: None,
        }
    }
}

/// Everything a caller configures on a viewer.
///
/// Built fresh by the caller on every render; the viewer never mutates it.
///
/// # Example
///
/// ```
/// use carrel::view::{LayoutMode, ViewerConfig};
/// use std::time::Duration;
///
/// let config = ViewerConfig::new()
///     .with_layout(LayoutMode::HorizontalScroll)
///     .with_auto_scroll(true)
///     .with_auto_scroll_interval(Duration::from_secs(4));
///
/// assert_eq!(config.initial_display_count, 6);
/// assert_eq!(config.load_more_increment(), 6);
/// ```
#[derive(Clone)]
pub struct ViewerConfig {
    pub category: Category,
    pub layout: LayoutMode,
    pub initial_display_count: usize,
    pub max_display_count: usize,
    /// Items added per "Load More" or threshold crossing. `None` means the
    /// initial display count.
    pub load_more_increment: Option<usize>,
    pub auto_scroll: bool,
    pub auto_scroll_interval: Duration,
    pub reset_timeout: Duration,
    pub show_view_all: bool,
    /// Skeleton slots while loading. `None` means the initial display count.
    pub skeleton_count: Option<usize>,
    pub empty_state: EmptyState,
    pub mapper: Option<Arc<ItemMapper>>,
    pub renderer: Option<Arc<dyn ItemRenderer>>,
    pub on_item_click: Option<ItemClickCallback>,
    pub on_view_all: Option<ViewAllCallback>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            category: Category::Default,
            layout: LayoutMode::Grid,
            initial_display_count: 6,
            max_display_count: 12,
            load_more_increment: None,
            auto_scroll: false,
            auto_scroll_interval: Duration::from_millis(3000),
            reset_timeout: Duration::from_millis(5000),
            show_view_all: true,
            skeleton_count: None,
            empty_state: EmptyState::default(),
            mapper: None,
            renderer: None,
            on_item_click: None,
            on_view_all: None,
        }
    }
}

impl ViewerConfig {
    /// Creates a configuration with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_initial_display_count(mut self, count: usize) -> Self {
        self.initial_display_count = count;
        self
    }

    pub fn with_max_display_count(mut self, count: usize) -> Self {
        self.max_display_count = count;
        self
    }

    pub fn with_load_more_increment(mut self, increment: usize) -> Self {
        self.load_more_increment = Some(increment);
        self
    }

    pub fn with_auto_scroll(mut self, enabled: bool) -> Self {
        self.auto_scroll = enabled;
        self
    }

    pub fn with_auto_scroll_interval(mut self, interval: Duration) -> Self {
        self.auto_scroll_interval = interval;
        self
    }

    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout = timeout;
        self
    }

    pub fn with_show_view_all(mut self, show: bool) -> Self {
        self.show_view_all = show;
        self
    }

    pub fn with_skeleton_count(mut self, count: usize) -> Self {
        self.skeleton_count = Some(count);
        self
    }

    pub fn with_empty_state(mut self, empty_state: EmptyState) -> Self {
        self.empty_state = empty_state;
        self
    }

    /// Uses `mapper` instead of field inference.
    pub fn with_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&SourceRecord) -> crate::model::DisplayItem + Send + Sync + 'static,
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    /// Uses `renderer` for every item, whatever the category.
    pub fn with_renderer<R: ItemRenderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn on_item_click<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SourceRecord) + Send + Sync + 'static,
    {
        self.on_item_click = Some(Arc::new(callback));
        self
    }

    pub fn on_view_all<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_view_all = Some(Arc::new(callback));
        self
    }

    /// The effective load-more increment.
    pub fn load_more_increment(&self) -> usize {
        self.load_more_increment.unwrap_or(self.initial_display_count)
    }

    /// The effective skeleton slot count.
    pub fn skeleton_count(&self) -> usize {
        self.skeleton_count.unwrap_or(self.initial_display_count)
    }

    /// Returns a copy with out-of-range values clamped.
    ///
    /// `max_display_count` is at least 1, `initial_display_count` at most
    /// `max_display_count`, the increment at least 1, and both durations at
    /// least one millisecond.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();

        if config.max_display_count == 0 {
            tracing::warn!(target: targets::SETTINGS, "max display count of 0 raised to 1");
            config.max_display_count = 1;
        }
        if config.initial_display_count > config.max_display_count {
            tracing::warn!(
                target: targets::SETTINGS,
                initial = config.initial_display_count,
                max = config.max_display_count,
                "initial display count clamped to max"
            );
            config.initial_display_count = config.max_display_count;
        }
        if config.load_more_increment() == 0 {
            tracing::warn!(target: targets::SETTINGS, "load-more increment of 0 raised to 1");
            config.load_more_increment = Some(1);
        }
        if config.auto_scroll_interval < MIN_DURATION {
            tracing::warn!(target: targets::SETTINGS, interval = ?config.auto_scroll_interval, "auto-scroll interval raised to 1ms");
            config.auto_scroll_interval = MIN_DURATION;
        }
        if config.reset_timeout < MIN_DURATION {
            tracing::warn!(target: targets::SETTINGS, timeout = ?config.reset_timeout, "reset timeout raised to 1ms");
            config.reset_timeout = MIN_DURATION;
        }
        config
    }

    /// The values the presentation controller derives its state from.
    ///
    /// Call on a sanitized configuration.
    pub fn params(&self) -> PresentationParams {
        PresentationParams {
            layout: self.layout,
            initial_display_count: self.initial_display_count,
            max_display_count: self.max_display_count,
            increment: self.load_more_increment(),
            auto_scroll: self.auto_scroll,
            auto_scroll_interval: self.auto_scroll_interval,
            reset_timeout: self.reset_timeout,
        }
    }
}

const MIN_DURATION: Duration = Duration::from_millis(1);

impl fmt::Debug for ViewerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerConfig")
            .field("category", &self.category)
            .field("layout", &self.layout)
            .field("initial_display_count", &self.initial_display_count)
            .field("max_display_count", &self.max_display_count)
            .field("load_more_increment", &self.load_more_increment)
            .field("auto_scroll", &self.auto_scroll)
            .field("auto_scroll_interval", &self.auto_scroll_interval)
            .field("reset_timeout", &self.reset_timeout)
            .field("show_view_all", &self.show_view_all)
            .field("skeleton_count", &self.skeleton_count)
            .field("empty_state", &self.empty_state)
            .field("has_mapper", &self.mapper.is_some())
            .field("has_renderer", &self.renderer.is_some())
            .finish_non_exhaustive()
    }
}

/// The subset of [`ViewerConfig`] the presentation controller depends on.
///
/// Compared on every configuration change; the controller only re-derives
/// its state when these differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationParams {
    pub layout: LayoutMode,
    pub initial_display_count: usize,
    pub max_display_count: usize,
    pub increment: usize,
    pub auto_scroll: bool,
    pub auto_scroll_interval: Duration,
    pub reset_timeout: Duration,
}

impl Default for PresentationParams {
    fn default() -> Self {
        ViewerConfig::default().params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.layout, LayoutMode::Grid);
        assert_eq!(config.initial_display_count, 6);
        assert_eq!(config.max_display_count, 12);
        assert!(!config.auto_scroll);
        assert_eq!(config.auto_scroll_interval, Duration::from_millis(3000));
        assert_eq!(config.reset_timeout, Duration::from_millis(5000));
        assert!(config.show_view_all);
        assert_eq!(config.skeleton_count(), 6);
    }

    #[test]
    fn test_sanitized_clamps() {
        let config = ViewerConfig::new()
            .with_initial_display_count(20)
            .with_max_display_count(8)
            .with_load_more_increment(0)
            .with_auto_scroll_interval(Duration::ZERO)
            .sanitized();

        assert_eq!(config.initial_display_count, 8);
        assert_eq!(config.load_more_increment(), 1);
        assert_eq!(config.auto_scroll_interval, Duration::from_millis(1));
    }

    #[test]
    fn test_increment_follows_initial_count() {
        let config = ViewerConfig::new().with_initial_display_count(4);
        assert_eq!(config.load_more_increment(), 4);
        assert_eq!(config.with_load_more_increment(2).load_more_increment(), 2);
    }

    #[test]
    fn test_layout_axis() {
        assert_eq!(LayoutMode::Grid.axis(), None);
        assert!(LayoutMode::VerticalScroll.is_scroll());
        assert_eq!(LayoutMode::HorizontalScroll.axis(), Some(Axis::Horizontal));
    }

    #[test]
    fn test_params_ignore_callbacks() {
        let plain = ViewerConfig::new();
        let with_callback = ViewerConfig::new().on_view_all(|| {});
        assert_eq!(plain.params(), with_callback.params());
    }
}
