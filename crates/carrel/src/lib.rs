//! Carrel - an adaptive collection viewer.
//!
//! Renders heterogeneous lists of records (courses, articles, people,
//! categories) as cards under a grid or a bounded scroll track, with
//! auto-advance, user-interrupt detection, progressive disclosure and an
//! idle reset. Carrel is headless: the host supplies a clock, a viewport
//! probe and input events, and draws the [`view::ViewerFrame`]s it gets back.
//!
//! The pipeline:
//!
//! 1. [`model::normalize`] turns each source record into a display item.
//! 2. [`delegate::select_renderer`] picks a card template for the category.
//! 3. [`view::PresentationController`] decides how many items are visible and
//!    drives auto-advance and the idle reset.
//! 4. [`view::build_frame`] lays the visible slice out.
//!
//! [`view::CollectionView`] wires the four together.
//!
//! # Example
//!
//! ```
//! use carrel::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let viewport = Arc::new(VirtualViewport::new(3000.0, 900.0));
//! let config = ViewerConfig::new()
//!     .with_category(Category::Course)
//!     .with_layout(LayoutMode::HorizontalScroll)
//!     .with_auto_scroll(true);
//!
//! let mut view = CollectionView::new(config, viewport.clone(), clock.clone());
//! view.set_records((0..10).map(|i| SourceRecord::from(json!({ "id": i, "title": format!("Course {i}") }))).collect());
//! view.mount();
//!
//! clock.advance(Duration::from_millis(500));
//! view.process_timers();
//! clock.advance(Duration::from_millis(3000));
//! view.process_timers();
//!
//! assert_eq!(viewport.metrics().offset, 300.0);
//! ```

pub use carrel_core::*;

pub mod delegate;
pub mod error;
pub mod model;
pub mod prelude;
pub mod settings;
pub mod view;

pub use error::ViewerError;

static_assertions::assert_impl_all!(view::CollectionView: Send);
