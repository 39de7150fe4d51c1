//! Change notification between value items, containers and listeners.
//!
//! A [`ChangeNotifier`] keeps a list of [`ChangeReceiver`]s and dispatches
//! [`ChangeEvent`]s to them synchronously. Dispatch is guarded in two ways:
//! the receiver list is locked while a notification runs, and nested
//! notifications beyond a depth limit are dropped with a warning.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::definitions::DEFAULT_MAX_NOTIFICATION_DEPTH;
use crate::error::{ModelError, Result};

/// Kind of change carried by a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ChangeKind {
    /// A single cell value changed.
    ValueChange,
    /// The matrix was replaced or its rows changed.
    MatrixChange,
    ActivityChange,
    DisplayChange,
    LockStatusChange,
    DeselectedChange,
    SelectedChange,
    HintChange,
    ErrorChange,
    /// The compartment payload was replaced.
    CompartmentChange,
    /// Value items were added to or removed from a container.
    ContainerNumberChange,
    /// Vertical positions of a container were reassigned.
    ContainerSortChange,
    /// The compartment payload reported an error change.
    CompartmentContainerErrorChange,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::ValueChange => "VALUE_ITEM_VALUE_CHANGE",
            ChangeKind::MatrixChange => "VALUE_ITEM_MATRIX_CHANGE",
            ChangeKind::ActivityChange => "VALUE_ITEM_ACTIVITY_CHANGE",
            ChangeKind::DisplayChange => "VALUE_ITEM_DISPLAY_CHANGE",
            ChangeKind::LockStatusChange => "VALUE_ITEM_LOCK_STATUS_CHANGE",
            ChangeKind::DeselectedChange => "VALUE_ITEM_DESELECTED_CHANGE",
            ChangeKind::SelectedChange => "VALUE_ITEM_SELECTED_CHANGE",
            ChangeKind::HintChange => "VALUE_ITEM_HINT_CHANGE",
            ChangeKind::ErrorChange => "VALUE_ITEM_ERROR_CHANGE",
            ChangeKind::CompartmentChange => "VALUE_ITEM_COMPARTMENT_CHANGE",
            ChangeKind::ContainerNumberChange => "VALUE_ITEM_CONTAINER_NUMBER_CHANGE",
            ChangeKind::ContainerSortChange => "VALUE_ITEM_CONTAINER_SORT_CHANGE",
            ChangeKind::CompartmentContainerErrorChange => "COMPARTMENT_CONTAINER_ERROR_CHANGE",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a change originated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// A value item, identified by name.
    ValueItem(String),
    /// A value item container.
    Container,
}

/// A change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub origin: ChangeOrigin,
    /// Optional detail, e.g. the block name of added value items.
    pub info: Option<String>,
}

impl ChangeEvent {
    /// Event raised by the value item `name`.
    pub fn value_item(kind: ChangeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            origin: ChangeOrigin::ValueItem(name.into()),
            info: None,
        }
    }

    /// Event raised by a container.
    pub fn container(kind: ChangeKind, info: Option<String>) -> Self {
        Self {
            kind,
            origin: ChangeOrigin::Container,
            info,
        }
    }

    /// Name of the originating value item, if any.
    pub fn value_item_name(&self) -> Option<&str> {
        match &self.origin {
            ChangeOrigin::ValueItem(name) => Some(name),
            ChangeOrigin::Container => None,
        }
    }
}

/// Listener for change events.
///
/// Receivers are called synchronously while the notifying object is being
/// mutated, so they only get the event, never the notifier itself.
pub trait ChangeReceiver {
    fn notify_change(&self, event: &ChangeEvent);
}

thread_local! {
    static NOTIFICATION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Restores the lock state and depth of a running dispatch when dropped.
struct DispatchGuard<'a> {
    lock: &'a Cell<bool>,
    was_locked: bool,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.lock.set(self.was_locked);
        NOTIFICATION_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Registry of change receivers.
pub struct ChangeNotifier {
    receivers: RefCell<Vec<Rc<dyn ChangeReceiver>>>,
    is_locked: Cell<bool>,
    is_suppressed: Cell<bool>,
    max_depth: usize,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NOTIFICATION_DEPTH)
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("receivers", &self.receivers.borrow().len())
            .field("is_suppressed", &self.is_suppressed.get())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

fn same_receiver(left: &Rc<dyn ChangeReceiver>, right: &Rc<dyn ChangeReceiver>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(left), Rc::as_ptr(right))
}

impl ChangeNotifier {
    /// Notifier that drops notifications nested deeper than `max_depth`.
    pub fn new(max_depth: usize) -> Self {
        Self {
            receivers: RefCell::new(Vec::new()),
            is_locked: Cell::new(false),
            is_suppressed: Cell::new(false),
            max_depth,
        }
    }

    /// Registers a receiver; the same receiver instance is added only once.
    pub fn add_change_receiver(&self, receiver: Rc<dyn ChangeReceiver>) -> Result<()> {
        self.ensure_unlocked()?;
        let mut receivers = self.receivers.borrow_mut();
        if !receivers.iter().any(|existing| same_receiver(existing, &receiver)) {
            receivers.push(receiver);
        }
        Ok(())
    }

    /// Removes one receiver instance if registered.
    pub fn remove_single_change_receiver(&self, receiver: &Rc<dyn ChangeReceiver>) -> Result<()> {
        self.ensure_unlocked()?;
        self.receivers
            .borrow_mut()
            .retain(|existing| !same_receiver(existing, receiver));
        Ok(())
    }

    pub fn remove_all_change_receivers(&self) -> Result<()> {
        self.ensure_unlocked()?;
        self.receivers.borrow_mut().clear();
        Ok(())
    }

    pub fn receiver_count(&self) -> usize {
        self.receivers.borrow().len()
    }

    pub fn is_notification_suppressed(&self) -> bool {
        self.is_suppressed.get()
    }

    pub fn set_notification_suppressed(&self, value: bool) {
        self.is_suppressed.set(value);
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Dispatches `event` to every receiver in registration order.
    ///
    /// Returns false when nothing was dispatched: no receivers, suppressed,
    /// or the nesting depth limit was reached.
    pub fn notify(&self, event: &ChangeEvent) -> bool {
        if self.is_suppressed.get() {
            return false;
        }
        let receivers: Vec<Rc<dyn ChangeReceiver>> = self.receivers.borrow().clone();
        if receivers.is_empty() {
            return false;
        }
        let depth = NOTIFICATION_DEPTH.with(Cell::get);
        if depth >= self.max_depth {
            warn!(kind = %event.kind, depth, "Dropping nested change notification");
            return false;
        }
        NOTIFICATION_DEPTH.with(|current| current.set(depth + 1));
        let _guard = DispatchGuard {
            lock: &self.is_locked,
            was_locked: self.is_locked.replace(true),
        };
        for receiver in &receivers {
            receiver.notify_change(event);
        }
        true
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.is_locked.get() {
            Err(ModelError::ReceiverListLocked)
        } else {
            Ok(())
        }
    }
}

/// Receiver that records every event; useful for listeners and tests.
#[derive(Debug, Default)]
pub struct ChangeRecorder {
    events: RefCell<Vec<ChangeEvent>>,
}

impl ChangeRecorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<ChangeKind> {
        self.events.borrow().iter().map(|event| event.kind).collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl ChangeReceiver for ChangeRecorder {
    fn notify_change(&self, event: &ChangeEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Forwards events to another notifier.
///
/// Containers register one of these on each of their value items so that
/// container-level receivers see item changes.
#[derive(Debug)]
pub(crate) struct ForwardingReceiver {
    target: std::rc::Weak<ChangeNotifier>,
}

impl ForwardingReceiver {
    pub(crate) fn new(target: &Rc<ChangeNotifier>) -> Self {
        Self {
            target: Rc::downgrade(target),
        }
    }
}

impl ChangeReceiver for ForwardingReceiver {
    fn notify_change(&self, event: &ChangeEvent) {
        if let Some(target) = self.target.upgrade() {
            target.notify(event);
        }
    }
}
