//! Signal/slot callbacks for Carrel.
//!
//! A [`Signal`] is a list of connected slots (closures) invoked in connection
//! order whenever the signal is emitted. Carrel is driven by a single-threaded
//! event loop, so every slot runs directly on the emitting thread and runs to
//! completion before `emit` returns.
//!
//! # Example
//!
//! ```
//! use carrel_core::Signal;
//!
//! let view_all = Signal::<()>::new();
//! let conn_id = view_all.connect(|_| println!("show the full catalogue"));
//!
//! view_all.emit(());
//! view_all.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// Handle returned by [`Signal::connect`], accepted by [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Slots keyed by id, plus the order they were connected in.
///
/// Slotmap reuses freed slots, so its own iteration order is not
/// connection order.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

impl<Args> Connections<Args> {
    fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, slot: Slot<Args>) -> ConnectionId {
        let id = self.slots.insert(slot);
        self.order.push(id);
        id
    }

    fn remove(&mut self, id: ConnectionId) -> bool {
        if self.slots.remove(id).is_none() {
            return false;
        }
        self.order.retain(|&other| other != id);
        true
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn snapshot(&self) -> Vec<Slot<Args>> {
        self.order.iter().filter_map(|&id| self.slots.get(id).cloned()).collect()
    }
}

/// Zero or more slots fired with a borrowed `Args` on every [`emit`](Self::emit).
///
/// Signals that carry nothing use `Signal<()>`.
pub struct Signal<Args> {
    connections: Mutex<Connections<Args>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// An unconnected signal.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections::new()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Appends `slot` to the connection list.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Appends a slot that is already behind an `Arc`.
    pub fn connect_shared(&self, slot: Arc<dyn Fn(&Args) + Send + Sync>) -> ConnectionId {
        self.connections.lock().insert(slot)
    }

    /// Appends `slot` for as long as the returned guard lives.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard { signal: self, id }
    }

    /// Removes one slot. `false` if `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id)
    }

    /// [`disconnect`](Self::disconnect) that errors on a stale `id`.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Removes every slot.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// While blocked, [`emit`](Self::emit) returns without calling any slot.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// The connection table is not locked while slots run, so a slot may
    /// connect or disconnect on the same signal.
    #[tracing::instrument(skip_all, target = "carrel_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots = self.connections.lock().snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

/// Scoped connection from [`Signal::connect_scoped`]; dropping it disconnects.
///
/// # Example
///
/// ```
/// use carrel_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let clicks = Signal::<i32>::new();
/// let seen = Arc::new(AtomicI32::new(0));
/// {
///     let sink = seen.clone();
///     let _guard = clicks.connect_scoped(move |&index| {
///         sink.fetch_add(index, Ordering::SeqCst);
///     });
///     clicks.emit(4);
/// }
/// clicks.emit(9);
/// assert_eq!(seen.load(Ordering::SeqCst), 4);
/// ```
pub struct ConnectionGuard<'a, Args: 'static> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<'_, Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}
