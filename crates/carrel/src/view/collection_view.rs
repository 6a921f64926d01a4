//! The collection viewer facade.

use std::sync::Arc;
use std::time::Duration;

use carrel_core::logging::targets;
use carrel_core::{Clock, ConnectionId, Signal};

use super::config::ViewerConfig;
use super::controller::{Effect, Phase, PresentationController, PresentationState, ViewerEvent};
use super::layout::{FrameInput, ViewerFrame, build_frame};
use super::viewport::ViewportProbe;
use crate::delegate::{AssetRegistry, ImageRegistry, ItemRenderer, select_renderer};
use crate::model::{DisplayItem, SourceRecord, normalize};

/// Renders a heterogeneous list of records under a configurable layout.
///
/// Ties together the normalizer, the renderer selection, the presentation
/// controller and the layout adapter. The host feeds it records, input
/// events and timer ticks, and draws whatever [`frame`](Self::frame) returns.
///
/// # Example
///
/// ```
/// use carrel::prelude::*;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let clock = Arc::new(ManualClock::new());
/// let viewport = Arc::new(VirtualViewport::new(0.0, 900.0));
/// let mut view = CollectionView::new(ViewerConfig::new(), viewport, clock);
///
/// let records = (0..20).map(|i| SourceRecord::from(json!({ "id": i, "name": format!("Course {i}") })));
/// view.set_records(records.collect());
/// view.mount();
///
/// assert_eq!(view.frame().cards().len(), 6);
/// view.load_more();
/// assert_eq!(view.frame().cards().len(), 12);
/// ```
pub struct CollectionView {
    config: ViewerConfig,
    records: Vec<SourceRecord>,
    items: Vec<DisplayItem>,
    registry: Arc<dyn ImageRegistry>,
    renderer: Arc<dyn ItemRenderer>,
    controller: PresentationController,
    click_connection: Option<ConnectionId>,
    view_all_connection: Option<ConnectionId>,

    /// Emitted with the source record when a card is activated.
    pub item_clicked: Signal<SourceRecord>,
    /// Emitted when the "View All" affordance is activated.
    pub view_all_requested: Signal<()>,
}

impl CollectionView {
    /// Creates an unmounted viewer with no records and an empty asset registry.
    pub fn new(config: ViewerConfig, probe: Arc<dyn ViewportProbe>, clock: Arc<dyn Clock>) -> Self {
        let config = config.sanitized();
        let renderer = select_renderer(config.category, config.renderer.clone());
        let controller = PresentationController::new(config.params(), 0, probe, clock);
        let mut view = Self {
            config,
            records: Vec::new(),
            items: Vec::new(),
            registry: Arc::new(AssetRegistry::new()),
            renderer,
            controller,
            click_connection: None,
            view_all_connection: None,
            item_clicked: Signal::new(),
            view_all_requested: Signal::new(),
        };
        view.connect_callbacks();
        view
    }

    /// Uses `registry` to resolve item images.
    pub fn with_registry(mut self, registry: Arc<dyn ImageRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the image registry.
    pub fn set_registry(&mut self, registry: Arc<dyn ImageRegistry>) {
        self.registry = registry;
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn records(&self) -> &[SourceRecord] {
        &self.records
    }

    pub fn state(&self) -> PresentationState {
        self.controller.state()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn controller(&self) -> &PresentationController {
        &self.controller
    }

    /// Mounts the viewer, arming the initial auto-advance settle if configured.
    pub fn mount(&mut self) {
        carrel_core::carrel_debug!(items = self.items.len(), "collection view mounted");
        self.controller.mount();
    }

    /// Unmounts the viewer. No timer is left pending.
    pub fn unmount(&mut self) {
        self.controller.unmount();
        carrel_core::carrel_debug!("collection view unmounted");
    }

    /// Replaces the records, re-normalizing them.
    pub fn set_records(&mut self, records: Vec<SourceRecord>) -> Effect {
        self.records = records;
        self.items = normalize(&self.records, self.config.mapper.as_deref());
        self.controller.set_item_count(self.items.len())
    }

    /// Marks a data load as pending or finished.
    pub fn set_loading(&mut self, loading: bool) -> Effect {
        self.controller.set_loading(loading)
    }

    /// Replaces the configuration.
    ///
    /// Callbacks are reconnected and items re-normalized; the controller only
    /// re-derives its state when the presentation parameters changed.
    pub fn set_config(&mut self, config: ViewerConfig) -> Effect {
        self.disconnect_callbacks();
        self.config = config.sanitized();
        self.connect_callbacks();
        self.renderer = select_renderer(self.config.category, self.config.renderer.clone());
        self.items = normalize(&self.records, self.config.mapper.as_deref());
        self.controller.set_params(self.config.params())
    }

    /// Handles a host input event.
    pub fn handle(&mut self, event: ViewerEvent) -> Effect {
        self.controller.handle(event)
    }

    /// Reveals the next increment of items.
    pub fn load_more(&mut self) -> Effect {
        self.controller.load_more()
    }

    /// Fires expired timers. Call from the host's event loop.
    pub fn process_timers(&mut self) -> Vec<Effect> {
        self.controller.process_timers()
    }

    /// How long the host may sleep before the next timer is due.
    pub fn time_until_next_timer(&mut self) -> Option<Duration> {
        self.controller.time_until_next_timer()
    }

    /// Number of pending timers.
    pub fn pending_timer_count(&self) -> usize {
        self.controller.pending_timer_count()
    }

    /// Builds the frame for the current state.
    pub fn frame(&self) -> ViewerFrame {
        build_frame(FrameInput {
            config: &self.config,
            items: &self.items,
            records: &self.records,
            registry: self.registry.as_ref(),
            renderer: self.renderer.as_ref(),
            state: self.controller.state(),
            loading: self.controller.is_loading(),
            remaining_cycle: self.controller.remaining_cycle(),
        })
    }

    /// Activates the card with `key`, emitting [`item_clicked`](Self::item_clicked).
    ///
    /// Returns `false` if no item has that key.
    pub fn activate(&self, key: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == key) else {
            tracing::debug!(target: targets::CONTROLLER, key, "activation for unknown key");
            return false;
        };
        match self.records.get(index) {
            Some(record) => {
                self.item_clicked.emit(record.clone());
                true
            }
            None => false,
        }
    }

    /// Emits [`view_all_requested`](Self::view_all_requested).
    pub fn request_view_all(&self) {
        self.view_all_requested.emit(());
    }

    fn connect_callbacks(&mut self) {
        if let Some(callback) = self.config.on_item_click.clone() {
            self.click_connection = Some(self.item_clicked.connect_shared(callback));
        }
        if let Some(callback) = self.config.on_view_all.clone() {
            self.view_all_connection = Some(self.view_all_requested.connect(move |_: &()| callback()));
        }
    }

    fn disconnect_callbacks(&mut self) {
        if let Some(id) = self.click_connection.take() {
            self.item_clicked.disconnect(id);
        }
        if let Some(id) = self.view_all_connection.take() {
            self.view_all_requested.disconnect(id);
        }
    }
}

impl Drop for CollectionView {
    fn drop(&mut self) {
        self.controller.unmount();
    }
}

impl std::fmt::Debug for CollectionView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionView")
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::Category;
    use crate::view::VirtualViewport;
    use carrel_core::ManualClock;
    use parking_lot::Mutex;
    use serde_json::json;

    fn view(config: ViewerConfig) -> CollectionView {
        CollectionView::new(
            config,
            Arc::new(VirtualViewport::new(3000.0, 900.0)),
            Arc::new(ManualClock::new()),
        )
    }

    fn records(n: usize) -> Vec<SourceRecord> {
        (0..n)
            .map(|i| SourceRecord::from(json!({ "slug": format!("c{i}"), "name": format!("Course {i}") })))
            .collect()
    }

    #[test]
    fn test_activate_emits_source_record() {
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let sink = clicked.clone();
        let mut view = view(ViewerConfig::new().on_item_click(move |record| {
            sink.lock().push(record.get("slug").cloned());
        }));
        view.set_records(records(3));

        assert!(view.activate("c1"));
        assert!(!view.activate("missing"));
        assert_eq!(*clicked.lock(), vec![Some(json!("c1"))]);
    }

    #[test]
    fn test_view_all_callback() {
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        let view = view(ViewerConfig::new().on_view_all(move || *sink.lock() += 1));

        view.request_view_all();
        view.request_view_all();
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_set_config_reconnects_callbacks() {
        let mut view = view(ViewerConfig::new().on_view_all(|| {}));
        assert_eq!(view.view_all_requested.connection_count(), 1);

        view.set_config(ViewerConfig::new().on_view_all(|| {}));
        assert_eq!(view.view_all_requested.connection_count(), 1);

        view.set_config(ViewerConfig::new());
        assert_eq!(view.view_all_requested.connection_count(), 0);
    }

    #[test]
    fn test_set_config_rerenders_with_new_category() {
        let mut view = view(ViewerConfig::new());
        view.set_records(records(2));
        view.mount();
        assert_eq!(view.frame().cards()[0].variant, Category::Default);

        view.set_config(ViewerConfig::new().with_category(Category::Course));
        assert_eq!(view.frame().cards()[0].variant, Category::Course);
    }

    #[test]
    fn test_mapper_from_config() {
        let mut view = view(ViewerConfig::new().with_mapper(|record: &SourceRecord| {
            DisplayItem::new(
                record.get("slug").and_then(|v| v.as_str()).unwrap_or_default(),
                "mapped",
            )
        }));
        view.set_records(records(2));
        assert!(view.items().iter().all(|item| item.title == "mapped"));
    }

    #[test]
    fn test_drop_is_clean_while_advancing() {
        let mut view = view(
            ViewerConfig::new()
                .with_layout(crate::view::LayoutMode::HorizontalScroll)
                .with_auto_scroll(true),
        );
        view.set_records(records(10));
        view.mount();
        assert_eq!(view.pending_timer_count(), 1);
        drop(view);
    }
}
