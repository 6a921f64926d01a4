//! The collection viewer: configuration, presentation state machine and
//! layout.
//!
//! [`CollectionView`] is the entry point. It owns a [`PresentationController`]
//! that decides how many items are visible and drives auto-advance, and builds
//! [`ViewerFrame`]s through the layout adapter.

mod collection_view;
mod config;
mod controller;
mod layout;
mod viewport;

pub use collection_view::CollectionView;
pub use config::{
    EmptyState, ItemClickCallback, LayoutMode, PresentationParams, ViewAllCallback, ViewerConfig,
};
pub use controller::{
    Effect, HORIZONTAL_STEP, INTERACTION_SETTLE, LOAD_THRESHOLD, MOUNT_SETTLE, Phase,
    PresentationController, PresentationState, VERTICAL_STEP, ViewerEvent,
};
pub use layout::{FrameInput, GridFrame, Indicators, TrackFrame, ViewerFrame, build_frame};
pub use viewport::{
    Axis, ScrollBehavior, ScrollMetrics, ScrollPosition, ScrollRequest, ViewportProbe,
    VirtualViewport,
};
