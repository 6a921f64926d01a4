//! The presentation controller.
//!
//! Owns everything about *how much* of the collection is visible and *where*
//! the track is: the display count, the expanded flag, the scroll position
//! and whether the user is interacting. It runs three timers on its own
//! [`TimerManager`]:
//!
//! - **settle**: a short delay before auto-advance (re)starts, 500ms after
//!   mount and 100ms after an interaction ends.
//! - **advance**: the repeating auto-advance tick.
//! - **reset**: the idle timeout, re-armed by every scroll event.
//!
//! A `Scrolled` event that lands on an offset the controller itself asked
//! for (an advance tick or the reset's return to origin) is an echo and only
//! updates the position. Any other scroll is the user's and interrupts
//! auto-advance like a pointer press.
//!
//! Arming a timer always stops the previous instance of the same timer, so
//! at most one of each is ever pending.
//!
//! Events go in through [`PresentationController::handle`] and timer expiry
//! through [`PresentationController::process_timers`]; both report what
//! changed as an [`Effect`].

use std::sync::Arc;
use std::time::Duration;

use carrel_core::logging::targets;
use carrel_core::{Clock, TimerId, TimerManager};

use super::config::PresentationParams;
use super::viewport::{Axis, ScrollBehavior, ScrollMetrics, ScrollPosition, ViewportProbe};

/// Delay before the first auto-advance cycle after mount.
pub const MOUNT_SETTLE: Duration = Duration::from_millis(500);

/// Delay before auto-advance resumes after an interaction ends.
pub const INTERACTION_SETTLE: Duration = Duration::from_millis(100);

/// Scroll fraction at which more items are revealed.
pub const LOAD_THRESHOLD: f32 = 0.9;

/// Pixels per auto-advance tick on a horizontal track.
pub const HORIZONTAL_STEP: f32 = 300.0;

/// Pixels per auto-advance tick on a vertical track.
pub const VERTICAL_STEP: f32 = 200.0;

/// The caller-visible presentation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationState {
    pub display_count: usize,
    pub expanded: bool,
    pub scroll_position: ScrollPosition,
    pub user_interacted: bool,
}

/// The controller's state, derived from its flags and pending timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing running.
    Idle,
    /// The advance timer is running.
    AutoAdvancing,
    /// The user is interacting, or has not been idle long enough.
    UserInteracting,
    /// Every available item is shown.
    Expanded,
    /// Expanded with the idle-reset timer pending.
    PendingReset,
}

/// Input events from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    MouseEnter,
    MouseLeave,
    PointerDown,
    PointerUp,
    TouchStart,
    TouchEnd,
    DragStart,
    DragEnd,
    /// The track scrolled, by the user or as an echo of a programmatic scroll.
    Scrolled(ScrollMetrics),
}

/// What changed as the result of an event or timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// No visible change.
    None,
    /// The number of visible items changed.
    DisplayCountChanged(usize),
    /// The display count reached its cap; the full set is shown.
    Expanded,
    /// Auto-advance moved the track to this offset.
    Advanced(f32),
    /// The idle timeout restored the initial presentation.
    Reset,
    /// Auto-advance started.
    Resumed,
    /// Auto-advance stopped.
    Suspended,
}

/// Sources that count as "the user is interacting".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Interactions {
    hover: bool,
    pointer: bool,
    touch: bool,
    drag: bool,
}

impl Interactions {
    fn any(self) -> bool {
        self.hover || self.pointer || self.touch || self.drag
    }
}

/// Tolerance when matching a reported offset against a requested one.
const ECHO_TOLERANCE: f32 = 0.5;

/// A programmatic scroll whose `Scrolled` reports are still expected.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollEcho {
    from: f32,
    to: f32,
}

impl ScrollEcho {
    fn new(from: f32, to: f32) -> Self {
        Self { from, to }
    }

    fn reached(self, offset: f32) -> bool {
        (offset - self.to).abs() <= ECHO_TOLERANCE
    }

    fn spans(self, offset: f32) -> bool {
        let (low, high) = if self.from <= self.to { (self.from, self.to) } else { (self.to, self.from) };
        (low - ECHO_TOLERANCE..=high + ECHO_TOLERANCE).contains(&offset)
    }
}

/// The presentation state machine for one viewer instance.
pub struct PresentationController {
    params: PresentationParams,
    item_count: usize,
    state: PresentationState,
    mounted: bool,
    loading: bool,
    interactions: Interactions,
    baseline: f32,
    echo: Option<ScrollEcho>,
    remaining_cycle: Option<Duration>,
    probe: Arc<dyn ViewportProbe>,
    timers: TimerManager,
    settle: Option<TimerId>,
    advance: Option<TimerId>,
    reset: Option<TimerId>,
}

impl PresentationController {
    /// Creates an unmounted controller.
    pub fn new(
        params: PresentationParams,
        item_count: usize,
        probe: Arc<dyn ViewportProbe>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            params,
            item_count,
            state: PresentationState {
                display_count: params.initial_display_count.min(item_count),
                expanded: false,
                scroll_position: ScrollPosition::START,
                user_interacted: false,
            },
            mounted: false,
            loading: false,
            interactions: Interactions::default(),
            baseline: 0.0,
            echo: None,
            remaining_cycle: None,
            probe,
            timers: TimerManager::with_clock(clock),
            settle: None,
            advance: None,
            reset: None,
        }
    }

    pub fn state(&self) -> PresentationState {
        self.state
    }

    pub fn params(&self) -> PresentationParams {
        self.params
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns `true` while the advance timer is running.
    pub fn is_auto_advancing(&self) -> bool {
        self.advance.is_some()
    }

    /// The current state.
    pub fn phase(&self) -> Phase {
        if self.state.expanded {
            if self.reset.is_some() {
                Phase::PendingReset
            } else {
                Phase::Expanded
            }
        } else if self.state.user_interacted {
            Phase::UserInteracting
        } else if self.advance.is_some() {
            Phase::AutoAdvancing
        } else {
            Phase::Idle
        }
    }

    /// Upper bound of the display count: `min(max, item_count)`.
    pub fn display_cap(&self) -> usize {
        self.params.max_display_count.min(self.item_count)
    }

    /// Lower bound of the display count: `min(initial, item_count)`.
    pub fn display_floor(&self) -> usize {
        self.params.initial_display_count.min(self.item_count)
    }

    /// Returns `true` while more items could still be revealed.
    pub fn has_more(&self) -> bool {
        self.state.display_count < self.display_cap()
    }

    /// Time left in the current auto-advance cycle, if advancing.
    ///
    /// The full cycle is `interval × ⌈extent / step⌉`; the remainder scales
    /// with how far through the scrollable extent the track already is.
    pub fn remaining_cycle(&self) -> Option<Duration> {
        self.remaining_cycle
    }

    /// Number of pending timers.
    pub fn pending_timer_count(&self) -> usize {
        self.timers.active_count()
    }

    /// Time until the next timer fires, for hosts that sleep between events.
    pub fn time_until_next_timer(&mut self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Starts the controller. Auto-advance begins after [`MOUNT_SETTLE`].
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.state.display_count = self.display_floor();
        if let Some(axis) = self.axis() {
            self.baseline = self.probe.scroll_metrics(axis).offset;
        }
        tracing::debug!(
            target: targets::CONTROLLER,
            display_count = self.state.display_count,
            items = self.item_count,
            "mounted"
        );
        if self.auto_advance_configured() {
            self.arm_settle(MOUNT_SETTLE);
        }
    }

    /// Stops the controller and cancels every timer.
    ///
    /// Events and timer processing are ignored afterwards. Interaction and
    /// expansion state is dropped so a later [`mount`](Self::mount) starts clean.
    pub fn unmount(&mut self) {
        self.timers.stop_all();
        self.settle = None;
        self.advance = None;
        self.reset = None;
        self.remaining_cycle = None;
        self.interactions = Interactions::default();
        self.state.expanded = false;
        self.state.user_interacted = false;
        self.echo = None;
        self.mounted = false;
        tracing::debug!(target: targets::CONTROLLER, "unmounted");
    }

    /// Marks a load as pending or finished.
    ///
    /// While loading every timer is suspended.
    pub fn set_loading(&mut self, loading: bool) -> Effect {
        if self.loading == loading {
            return Effect::None;
        }
        self.loading = loading;
        if loading {
            let was_advancing = self.advance.is_some();
            self.timers.stop_all();
            self.settle = None;
            self.advance = None;
            self.reset = None;
            self.remaining_cycle = None;
            tracing::debug!(target: targets::CONTROLLER, "loading, timers suspended");
            if was_advancing { Effect::Suspended } else { Effect::None }
        } else {
            tracing::debug!(target: targets::CONTROLLER, "loading finished");
            if self.mounted && self.auto_advance_configured() {
                self.arm_settle(MOUNT_SETTLE);
            }
            if self.mounted && self.state.expanded {
                self.arm_reset();
            }
            Effect::None
        }
    }

    /// Updates the number of available items.
    ///
    /// The display count is re-clamped into `[floor, cap]`.
    pub fn set_item_count(&mut self, item_count: usize) -> Effect {
        self.item_count = item_count;
        let effect = self.clamp_display_count();
        self.refresh_auto_advance();
        effect
    }

    /// Replaces the derived parameters. Does nothing if they are unchanged.
    pub fn set_params(&mut self, params: PresentationParams) -> Effect {
        if self.params == params {
            return Effect::None;
        }
        let interval_changed = self.params.auto_scroll_interval != params.auto_scroll_interval;
        let reset_changed = self.params.reset_timeout != params.reset_timeout;
        self.params = params;
        tracing::debug!(target: targets::CONTROLLER, ?params, "parameters changed");

        if interval_changed && self.advance.is_some() {
            self.start_advance();
        }
        if reset_changed && self.reset.is_some() {
            self.arm_reset();
        }
        let effect = self.clamp_display_count();
        self.refresh_auto_advance();
        effect
    }

    /// Handles a host event.
    pub fn handle(&mut self, event: ViewerEvent) -> Effect {
        if !self.mounted {
            return Effect::None;
        }
        match event {
            ViewerEvent::MouseEnter => self.interaction_started(|i| i.hover = true),
            ViewerEvent::PointerDown => self.interaction_started(|i| i.pointer = true),
            ViewerEvent::TouchStart => self.interaction_started(|i| i.touch = true),
            ViewerEvent::DragStart => self.interaction_started(|i| i.drag = true),
            ViewerEvent::MouseLeave => self.interaction_ended(|i| i.hover = false),
            ViewerEvent::PointerUp => self.interaction_ended(|i| i.pointer = false),
            ViewerEvent::TouchEnd => self.interaction_ended(|i| i.touch = false),
            ViewerEvent::DragEnd => self.interaction_ended(|i| i.drag = false),
            ViewerEvent::Scrolled(metrics) => self.on_scroll(metrics),
        }
    }

    /// Reveals the next increment of items. Used by the grid's "Load More".
    pub fn load_more(&mut self) -> Effect {
        if !self.mounted || !self.has_more() {
            return Effect::None;
        }
        self.grow()
    }

    /// Fires expired timers and returns the resulting effects.
    ///
    /// Returns nothing once unmounted.
    pub fn process_timers(&mut self) -> Vec<Effect> {
        if !self.mounted {
            return Vec::new();
        }
        let mut effects = Vec::new();
        for id in self.timers.process_expired() {
            let effect = if Some(id) == self.settle {
                self.settle = None;
                self.on_settle()
            } else if Some(id) == self.advance {
                self.on_advance_tick()
            } else if Some(id) == self.reset {
                self.reset = None;
                self.on_reset()
            } else {
                Effect::None
            };
            if effect != Effect::None {
                effects.push(effect);
            }
        }
        effects
    }

    fn axis(&self) -> Option<Axis> {
        self.params.layout.axis()
    }

    fn step(&self) -> f32 {
        match self.axis() {
            Some(Axis::Vertical) => VERTICAL_STEP,
            _ => HORIZONTAL_STEP,
        }
    }

    /// Static preconditions: the configuration asks for auto-advance and
    /// there is something to show.
    fn auto_advance_configured(&self) -> bool {
        self.params.auto_scroll && self.params.layout.is_scroll() && self.item_count > 0 && !self.loading
    }

    /// Whether auto-advance may run right now.
    fn can_auto_advance(&self) -> bool {
        if !self.mounted
            || !self.auto_advance_configured()
            || self.state.user_interacted
            || self.interactions.any()
        {
            return false;
        }
        let overflows = self
            .axis()
            .map(|axis| self.probe.scroll_metrics(axis).max_offset() > 0.0)
            .unwrap_or(false);
        overflows || self.item_count > self.state.display_count
    }

    fn interaction_started(&mut self, set: impl FnOnce(&mut Interactions)) -> Effect {
        set(&mut self.interactions);
        self.state.user_interacted = true;
        self.echo = None;
        self.cancel_settle();
        if let Some(axis) = self.axis() {
            self.baseline = self.probe.scroll_metrics(axis).offset;
        }
        if self.cancel_advance() {
            tracing::debug!(target: targets::CONTROLLER, baseline = self.baseline, "interaction, auto-advance halted");
            Effect::Suspended
        } else {
            Effect::None
        }
    }

    /// With every source released, auto-advance resumes after
    /// [`INTERACTION_SETTLE`]. A viewer that cannot auto-advance has nothing
    /// to settle and drops the flag at once.
    fn interaction_ended(&mut self, clear: impl FnOnce(&mut Interactions)) -> Effect {
        clear(&mut self.interactions);
        if self.interactions.any() {
            return Effect::None;
        }
        if self.auto_advance_configured() {
            self.arm_settle(INTERACTION_SETTLE);
        } else {
            self.state.user_interacted = false;
        }
        Effect::None
    }

    fn on_scroll(&mut self, metrics: ScrollMetrics) -> Effect {
        if self.axis().is_none() {
            return Effect::None;
        }
        let user_scroll = !self.consume_echo(metrics.offset);
        self.state.scroll_position = ScrollPosition::from(metrics);
        let halted = if user_scroll {
            self.baseline = metrics.offset;
            self.user_scrolled()
        } else {
            false
        };
        if !self.loading {
            self.arm_reset();
        }

        if metrics.max_offset() <= 0.0 || metrics.fraction() < LOAD_THRESHOLD {
            return if halted { Effect::Suspended } else { Effect::None };
        }
        if self.has_more() {
            self.grow()
        } else if !self.state.expanded {
            self.state.expanded = true;
            tracing::debug!(target: targets::CONTROLLER, display_count = self.state.display_count, "expanded");
            Effect::Expanded
        } else if halted {
            Effect::Suspended
        } else {
            Effect::None
        }
    }

    /// Returns `true` if `offset` belongs to the programmatic scroll in flight.
    ///
    /// A smooth scroll reports intermediate offsets between its start and
    /// target; the echo ends once the target is reached or anything outside
    /// that span arrives.
    fn consume_echo(&mut self, offset: f32) -> bool {
        let Some(echo) = self.echo else {
            return false;
        };
        if echo.reached(offset) {
            self.echo = None;
            true
        } else if echo.spans(offset) {
            true
        } else {
            self.echo = None;
            false
        }
    }

    /// A scroll the controller did not request. Returns `true` if it halted
    /// auto-advance.
    fn user_scrolled(&mut self) -> bool {
        self.state.user_interacted = true;
        let halted = self.cancel_advance();
        if halted {
            tracing::debug!(target: targets::CONTROLLER, baseline = self.baseline, "user scroll, auto-advance halted");
        }
        if !self.interactions.any() && self.auto_advance_configured() {
            self.arm_settle(INTERACTION_SETTLE);
        }
        halted
    }

    fn on_settle(&mut self) -> Effect {
        if !self.interactions.any() {
            self.state.user_interacted = false;
        }
        if self.advance.is_none() && self.can_auto_advance() {
            self.start_advance();
            Effect::Resumed
        } else {
            Effect::None
        }
    }

    fn on_advance_tick(&mut self) -> Effect {
        let Some(axis) = self.axis() else {
            self.cancel_advance();
            return Effect::None;
        };
        if !self.can_auto_advance() {
            self.cancel_advance();
            return Effect::Suspended;
        }

        let metrics = self.probe.scroll_metrics(axis);
        let extent = metrics.max_offset();
        let mut next = self.baseline + self.step();
        if next > extent {
            next = 0.0;
        }
        self.echo = Some(ScrollEcho::new(self.baseline, next));
        self.probe.scroll_to(axis, next, ScrollBehavior::Smooth);
        self.baseline = next;
        self.state.scroll_position = ScrollPosition::new(if extent > 0.0 { next / extent } else { 0.0 });
        self.remaining_cycle = Some(self.cycle_remaining(extent));
        tracing::trace!(target: targets::CONTROLLER, offset = next, extent, "advanced");
        Effect::Advanced(next)
    }

    /// The idle timeout. Clears a lingering interaction flag; the full
    /// reset only applies while expanded, so a second timeout is a no-op.
    fn on_reset(&mut self) -> Effect {
        if !self.interactions.any() {
            self.state.user_interacted = false;
        }
        if !self.state.expanded {
            return Effect::None;
        }
        self.state.display_count = self.display_floor();
        self.state.expanded = false;
        self.state.user_interacted = false;
        self.state.scroll_position = ScrollPosition::START;
        if let Some(axis) = self.axis() {
            self.echo = Some(ScrollEcho::new(self.baseline, 0.0));
            self.probe.scroll_to(axis, 0.0, ScrollBehavior::Smooth);
        }
        self.baseline = 0.0;
        tracing::debug!(target: targets::CONTROLLER, display_count = self.state.display_count, "idle reset");
        if self.auto_advance_configured() && !self.interactions.any() {
            self.arm_settle(INTERACTION_SETTLE);
        }
        Effect::Reset
    }

    fn grow(&mut self) -> Effect {
        let next = (self.state.display_count + self.params.increment).min(self.display_cap());
        self.state.display_count = next;
        tracing::debug!(target: targets::CONTROLLER, display_count = next, "display count increased");
        Effect::DisplayCountChanged(next)
    }

    fn clamp_display_count(&mut self) -> Effect {
        let floor = self.display_floor();
        let cap = self.display_cap();
        let clamped = self.state.display_count.clamp(floor, cap.max(floor));
        if self.state.expanded && clamped < cap {
            self.state.expanded = false;
        }
        if clamped != self.state.display_count {
            self.state.display_count = clamped;
            Effect::DisplayCountChanged(clamped)
        } else {
            Effect::None
        }
    }

    /// Stops auto-advance if it became ineligible, or arms the settle timer
    /// if it became eligible.
    fn refresh_auto_advance(&mut self) {
        if !self.mounted {
            return;
        }
        if !self.auto_advance_configured() {
            self.cancel_settle();
            self.cancel_advance();
        } else if self.advance.is_none() && self.settle.is_none() && !self.interactions.any() {
            self.arm_settle(MOUNT_SETTLE);
        }
    }

    fn cycle_remaining(&self, extent: f32) -> Duration {
        let steps = (extent / self.step()).ceil().max(1.0);
        let full = self.params.auto_scroll_interval.mul_f64(f64::from(steps));
        if extent <= 0.0 {
            return full;
        }
        let done = (f64::from(self.baseline.abs()) / f64::from(extent)).clamp(0.0, 1.0);
        full.mul_f64(1.0 - done)
    }

    fn start_advance(&mut self) {
        self.cancel_advance();
        self.advance = Some(self.timers.start_repeating(self.params.auto_scroll_interval));
        if let Some(axis) = self.axis() {
            let extent = self.probe.scroll_metrics(axis).max_offset();
            self.remaining_cycle = Some(self.cycle_remaining(extent));
        }
        tracing::debug!(target: targets::CONTROLLER, baseline = self.baseline, "auto-advance started");
    }

    fn arm_settle(&mut self, delay: Duration) {
        self.cancel_settle();
        self.settle = Some(self.timers.start_one_shot(delay));
    }

    fn arm_reset(&mut self) {
        if let Some(id) = self.reset.take() {
            let _ = self.timers.stop(id);
        }
        self.reset = Some(self.timers.start_one_shot(self.params.reset_timeout));
    }

    fn cancel_settle(&mut self) {
        if let Some(id) = self.settle.take() {
            let _ = self.timers.stop(id);
        }
    }

    /// Returns `true` if an advance timer was running.
    fn cancel_advance(&mut self) -> bool {
        self.remaining_cycle = None;
        match self.advance.take() {
            Some(id) => {
                let _ = self.timers.stop(id);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for PresentationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationController")
            .field("params", &self.params)
            .field("item_count", &self.item_count)
            .field("state", &self.state)
            .field("phase", &self.phase())
            .field("mounted", &self.mounted)
            .field("loading", &self.loading)
            .field("pending_timers", &self.timers.active_count())
            .finish_non_exhaustive()
    }
}
