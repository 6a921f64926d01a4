//! Layout adapter.
//!
//! Maps the layout mode and the controller's state onto a framework-neutral
//! [`ViewerFrame`]. Sizing comes from the category's fixed metrics table.

use std::time::Duration;

use carrel_core::PerfSpan;
use carrel_core::logging::targets;

use super::config::{EmptyState, LayoutMode, ViewerConfig};
use super::controller::PresentationState;
use super::viewport::{Axis, ScrollPosition};
use crate::delegate::{CardSize, ImageRegistry, ItemRenderer, RenderContext, RenderedCard};
use crate::model::{DisplayItem, SourceRecord};

/// What the host should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerFrame {
    /// A load is pending.
    Loading {
        /// Number of skeleton placeholders.
        skeletons: usize,
    },
    /// There are no items.
    Empty(EmptyState),
    Grid(GridFrame),
    Track(TrackFrame),
}

impl ViewerFrame {
    /// The rendered cards, if any.
    pub fn cards(&self) -> &[RenderedCard] {
        match self {
            ViewerFrame::Grid(grid) => &grid.cards,
            ViewerFrame::Track(track) => &track.cards,
            ViewerFrame::Loading { .. } | ViewerFrame::Empty(_) => &[],
        }
    }

    /// Whether the "View All" affordance is shown.
    pub fn shows_view_all(&self) -> bool {
        match self {
            ViewerFrame::Grid(grid) => grid.view_all,
            ViewerFrame::Track(track) => track.view_all,
            ViewerFrame::Loading { .. } | ViewerFrame::Empty(_) => false,
        }
    }
}

/// A fixed column template.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    pub columns: usize,
    pub cards: Vec<RenderedCard>,
    /// Show the "Load More" button.
    pub load_more: bool,
    /// Show the "View All" button.
    pub view_all: bool,
}

/// Position dots under a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indicators {
    pub count: usize,
    pub active: usize,
}

impl Indicators {
    /// One dot per `bucket_size` visible cards, with the active dot picked
    /// from the scroll position.
    pub fn compute(visible: usize, bucket_size: usize, position: ScrollPosition) -> Self {
        let count = visible.div_ceil(bucket_size.max(1));
        Self {
            count,
            active: position.bucket(count),
        }
    }
}

/// A single scrolling track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFrame {
    pub axis: Axis,
    pub cards: Vec<RenderedCard>,
    pub card_size: CardSize,
    /// Append a loading sentinel after the last card.
    pub sentinel: bool,
    pub indicators: Indicators,
    /// Scroll position for presentation, e.g. `"42.5%"`.
    pub position: String,
    /// Time left in the auto-advance cycle, if advancing.
    pub remaining_cycle: Option<Duration>,
    pub view_all: bool,
}

/// Inputs to [`build_frame`].
#[derive(Clone, Copy)]
pub struct FrameInput<'a> {
    pub config: &'a ViewerConfig,
    pub items: &'a [DisplayItem],
    pub records: &'a [SourceRecord],
    pub registry: &'a dyn ImageRegistry,
    pub renderer: &'a dyn ItemRenderer,
    pub state: PresentationState,
    pub loading: bool,
    pub remaining_cycle: Option<Duration>,
}

/// Builds the frame for the current state.
///
/// Loading wins over everything, then the empty state; otherwise the first
/// `display_count` items are rendered into the layout's container.
pub fn build_frame(input: FrameInput<'_>) -> ViewerFrame {
    let _perf = PerfSpan::new("build_frame");
    let config = input.config;

    if input.loading {
        return ViewerFrame::Loading {
            skeletons: config.skeleton_count(),
        };
    }
    if input.items.is_empty() {
        return ViewerFrame::Empty(config.empty_state.clone());
    }

    let metrics = config.category.metrics();
    let display_count = input.state.display_count.min(input.items.len());
    let cap = config.max_display_count.min(input.items.len());
    let has_more = display_count < cap;
    let view_all = config.show_view_all && input.items.len() > display_count;

    let cards: Vec<RenderedCard> = input
        .items
        .iter()
        .zip(input.records)
        .enumerate()
        .take(display_count)
        .map(|(index, (item, record))| {
            let ctx = RenderContext::new(config.category, input.registry, index);
            input.renderer.render(item, record, &ctx)
        })
        .collect();

    tracing::trace!(
        target: targets::LAYOUT,
        layout = ?config.layout,
        cards = cards.len(),
        has_more,
        view_all,
        "frame built"
    );

    match config.layout {
        LayoutMode::Grid => ViewerFrame::Grid(GridFrame {
            columns: metrics.grid_columns,
            cards,
            load_more: has_more,
            view_all,
        }),
        LayoutMode::HorizontalScroll | LayoutMode::VerticalScroll => {
            let axis = match config.layout {
                LayoutMode::VerticalScroll => Axis::Vertical,
                _ => Axis::Horizontal,
            };
            let position = input.state.scroll_position;
            ViewerFrame::Track(TrackFrame {
                axis,
                indicators: Indicators::compute(cards.len(), metrics.items_per_indicator, position),
                cards,
                card_size: CardSize {
                    width: metrics.card_width,
                    height: metrics.card_height,
                },
                sentinel: has_more,
                position: position.as_percent_string(),
                remaining_cycle: input.remaining_cycle,
                view_all,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::{AssetRegistry, BuiltinRenderer, Category};
    use crate::model::normalize;
    use serde_json::json;

    fn records(n: usize) -> Vec<SourceRecord> {
        (0..n)
            .map(|i| SourceRecord::from(json!({ "id": i, "title": format!("Course {i}") })))
            .collect()
    }

    fn state(display_count: usize, fraction: f32) -> PresentationState {
        PresentationState {
            display_count,
            expanded: false,
            scroll_position: ScrollPosition::new(fraction),
            user_interacted: false,
        }
    }

    fn frame(config: &ViewerConfig, records: &[SourceRecord], state: PresentationState, loading: bool) -> ViewerFrame {
        let items = normalize(records, None);
        let registry = AssetRegistry::new();
        let renderer = BuiltinRenderer::for_category(config.category);
        build_frame(FrameInput {
            config,
            items: &items,
            records,
            registry: &registry,
            renderer: &renderer,
            state,
            loading,
            remaining_cycle: None,
        })
    }

    #[test]
    fn test_loading_wins() {
        let config = ViewerConfig::new().with_skeleton_count(3);
        assert_eq!(
            frame(&config, &records(5), state(5, 0.0), true),
            ViewerFrame::Loading { skeletons: 3 }
        );
    }

    #[test]
    fn test_empty_state() {
        let config = ViewerConfig::new();
        assert_eq!(
            frame(&config, &[], state(0, 0.0), false),
            ViewerFrame::Empty(EmptyState::default())
        );
    }

    #[test]
    fn test_grid_slice_and_affordances() {
        let config = ViewerConfig::new().with_category(Category::Category);
        let ViewerFrame::Grid(grid) = frame(&config, &records(20), state(6, 0.0), false) else {
            panic!("expected grid");
        };
        assert_eq!(grid.columns, 6);
        assert_eq!(grid.cards.len(), 6);
        assert_eq!(grid.cards[5].key, "5");
        assert!(grid.load_more);
        assert!(grid.view_all);
    }

    #[test]
    fn test_view_all_hidden_when_everything_shown() {
        let config = ViewerConfig::new();
        let built = frame(&config, &records(4), state(4, 0.0), false);
        assert!(!built.shows_view_all());

        let hidden = ViewerConfig::new().with_show_view_all(false);
        assert!(!frame(&hidden, &records(20), state(6, 0.0), false).shows_view_all());
    }

    #[test]
    fn test_track_indicators_and_sentinel() {
        let config = ViewerConfig::new()
            .with_layout(LayoutMode::HorizontalScroll)
            .with_category(Category::Course);
        let ViewerFrame::Track(track) = frame(&config, &records(10), state(6, 0.6), false) else {
            panic!("expected track");
        };
        assert_eq!(track.axis, Axis::Horizontal);
        assert_eq!(track.indicators, Indicators { count: 2, active: 1 });
        assert!(track.sentinel);
        assert_eq!(track.position, "60%");
        assert_eq!(track.card_size.width, 320.0);
    }

    #[test]
    fn test_no_sentinel_at_cap() {
        let config = ViewerConfig::new().with_layout(LayoutMode::VerticalScroll);
        let ViewerFrame::Track(track) = frame(&config, &records(12), state(12, 1.0), false) else {
            panic!("expected track");
        };
        assert_eq!(track.axis, Axis::Vertical);
        assert!(!track.sentinel);
        assert_eq!(track.indicators.active, track.indicators.count - 1);
    }
}
