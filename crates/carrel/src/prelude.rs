//! Prelude module for Carrel.
//!
//! ```
//! use carrel::prelude::*;
//! ```

pub use carrel_core::{Clock, ManualClock, Signal, SystemClock};

pub use crate::delegate::{
    AssetRegistry, Category, ImageRegistry, ItemRenderer, RenderContext, RenderedCard,
};
pub use crate::model::{DisplayItem, ImageReference, SourceRecord};
pub use crate::settings::ViewerSettings;
pub use crate::view::{
    CollectionView, Effect, LayoutMode, Phase, ScrollMetrics, ViewerConfig, ViewerEvent,
    ViewerFrame, ViewportProbe, VirtualViewport,
};
