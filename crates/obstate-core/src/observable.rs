#![forbid(unsafe_code)]

//! Listener registry and change dispatch for state types.
//!
//! # Design
//!
//! [`ObservableState<T>`] is embedded in every state type `T` (see
//! [`StateModel`]). It owns an ordered list of listeners in shared,
//! reference-counted storage (`Rc<RefCell<..>>`). Each listener either
//! matches one declared property name or matches every change.
//!
//! Property setters call [`ObservableState::set_and_notify`], which stores the
//! new value and then calls [`ObservableState::notify_changed`]. Dispatch
//! snapshots the matching listeners, releases the borrow, and invokes them in
//! registration order on the caller's stack.
//!
//! # Invariants
//!
//! 1. Listeners fire in registration order; property-specific and any-change
//!    listeners share one FIFO sequence.
//! 2. A listener registered during a dispatch is not invoked by that dispatch.
//! 3. A listener removed during a dispatch is not invoked afterwards, even if
//!    it was part of the snapshot.
//! 4. Under [`NotifyPolicy::OnChange`], writing an equal value neither stores
//!    nor notifies.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown selector | Key or name not declared on `T` | `StateError::InvalidSelector`, nothing registered |
//! | Unmatched notify | No listener for the name | No-op |
//! | Listener panic | Callback unwinds | Propagates to the setter caller; later listeners skipped |
//! | Runaway re-entrancy | Listeners keep mutating the state | Panic once `max_dispatch_depth` is exceeded |

use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use tracing::{debug, debug_span, trace};

use crate::config::{NotifyPolicy, StateConfig};
use crate::error::StateError;
use crate::key::PropertyKey;
use crate::model::StateModel;

/// Identifier of one registered listener, unique per state instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Callback plus liveness flag, shared between the registry and dispatch
/// snapshots.
struct ListenerSlot {
    callback: Box<dyn Fn()>,
    active: Cell<bool>,
}

struct Listener {
    id: SubscriptionId,
    /// `None` matches every change.
    property: Option<&'static str>,
    slot: Rc<ListenerSlot>,
}

impl Listener {
    fn matches(&self, property: &str) -> bool {
        self.property.is_none_or(|p| p == property)
    }
}

#[derive(Default)]
struct Registry {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl Registry {
    fn push(&mut self, property: Option<&'static str>, callback: Box<dyn Fn()>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push(Listener {
            id,
            property,
            slot: Rc::new(ListenerSlot {
                callback,
                active: Cell::new(true),
            }),
        });
        id
    }

    /// Detach a listener. The caller drops it after releasing the borrow:
    /// its callback may own guards that unsubscribe from this registry.
    fn remove(&mut self, id: SubscriptionId) -> Option<Listener> {
        let idx = self.listeners.iter().position(|l| l.id == id)?;
        let listener = self.listeners.remove(idx);
        listener.slot.active.set(false);
        Some(listener)
    }

    fn contains(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }
}

/// Change-notification core embedded in a state type `T`.
///
/// Not `Send`/`Sync`: the state is owned by a single logical thread and
/// shared between consumers with `Rc`.
pub struct ObservableState<T> {
    registry: Rc<RefCell<Registry>>,
    config: StateConfig,
    depth: Cell<usize>,
    _model: PhantomData<fn() -> T>,
}

impl<T: StateModel> Default for ObservableState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObservableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("ObservableState")
            .field("model", &std::any::type_name::<T>())
            .field("listener_count", &registry.listeners.len())
            .field("notify_policy", &self.config.notify_policy)
            .finish()
    }
}

impl<T: StateModel> ObservableState<T> {
    /// Create an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StateConfig::default())
    }

    /// Create an empty registry with an explicit configuration.
    #[must_use]
    pub fn with_config(config: StateConfig) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            config,
            depth: Cell::new(0),
            _model: PhantomData,
        }
    }

    /// The configuration this instance was built with.
    #[must_use]
    pub fn config(&self) -> StateConfig {
        self.config
    }

    /// Names of the properties `T` declares.
    #[must_use]
    pub fn declared_properties(&self) -> &'static [&'static str] {
        T::PROPERTIES
    }

    /// Raise a change event for `property`.
    ///
    /// Every listener matching `property` (including any-change listeners)
    /// is invoked synchronously in registration order. A name nobody listens
    /// to is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if nested dispatches exceed
    /// [`StateConfig::max_dispatch_depth`], and propagates any panic raised
    /// by a listener.
    pub fn notify_changed(&self, property: &str) {
        debug_assert!(!property.is_empty(), "change event without a property name");

        // Snapshot first so listeners can subscribe, unsubscribe or mutate
        // the state without hitting an outstanding borrow.
        let snapshot: Vec<Rc<ListenerSlot>> = {
            let registry = self.registry.borrow();
            registry
                .listeners
                .iter()
                .filter(|l| l.matches(property))
                .map(|l| Rc::clone(&l.slot))
                .collect()
        };

        if snapshot.is_empty() {
            trace!(model = std::any::type_name::<T>(), property, "no listeners");
            return;
        }

        let _depth = DispatchDepth::enter(&self.depth, self.config.max_dispatch_depth, property);
        let _span = debug_span!(
            "obstate.dispatch",
            model = std::any::type_name::<T>(),
            property,
            listeners = snapshot.len()
        )
        .entered();

        for slot in &snapshot {
            if slot.active.get() {
                (slot.callback)();
            }
        }
    }

    /// Store `value` in `slot` and notify listeners of `key`.
    ///
    /// Under [`NotifyPolicy::OnChange`] an equal value is ignored entirely.
    /// Under [`NotifyPolicy::Always`] every write notifies. Returns whether a
    /// notification was raised. The slot is not borrowed while listeners
    /// run, so they may read or write the property.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is already borrowed, or for the reasons listed on
    /// [`notify_changed`](Self::notify_changed).
    pub fn set_and_notify<V: PartialEq>(
        &self,
        slot: &RefCell<V>,
        value: V,
        key: PropertyKey<T, V>,
    ) -> bool {
        {
            let mut current = slot.borrow_mut();
            if self.config.notify_policy == NotifyPolicy::OnChange && *current == value {
                debug!(
                    model = std::any::type_name::<T>(),
                    property = key.name(),
                    "value unchanged, skipping notification"
                );
                return false;
            }
            *current = value;
        }
        self.notify_changed(key.name());
        true
    }

    /// Register `callback` for changes to the property `selector` names.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidSelector`] if the key does not name a
    /// property declared by `T`. Nothing is registered in that case.
    pub fn subscribe_to_property_change<V>(
        &self,
        selector: PropertyKey<T, V>,
        callback: impl Fn() + 'static,
    ) -> Result<Subscription, StateError> {
        self.subscribe_to_property_named(selector.name(), callback)
    }

    /// Register `callback` for changes to the property called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidSelector`] if `name` is empty or not
    /// declared by `T`. Nothing is registered in that case.
    pub fn subscribe_to_property_named(
        &self,
        name: &str,
        callback: impl Fn() + 'static,
    ) -> Result<Subscription, StateError> {
        let property = Self::resolve(name)?;
        Ok(self.register(Some(property), Box::new(callback)))
    }

    /// Register `callback` for every change on this instance.
    pub fn subscribe_to_any_change(&self, callback: impl Fn() + 'static) -> Subscription {
        self.register(None, Box::new(callback))
    }

    /// Remove a listener by id. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let detached = self.registry.borrow_mut().remove(id);
        let removed = detached.is_some();
        drop(detached);
        debug!(model = std::any::type_name::<T>(), %id, removed, "unsubscribe");
        removed
    }

    /// Number of registered listeners of both kinds.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Number of listeners registered specifically for `property`.
    #[must_use]
    pub fn listener_count_for(&self, property: &str) -> usize {
        self.registry
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.property == Some(property))
            .count()
    }

    fn resolve(name: &str) -> Result<&'static str, StateError> {
        T::PROPERTIES
            .iter()
            .copied()
            .find(|p| !name.is_empty() && *p == name)
            .ok_or_else(|| StateError::InvalidSelector {
                property: name.to_string(),
                model: std::any::type_name::<T>(),
            })
    }

    fn register(&self, property: Option<&'static str>, callback: Box<dyn Fn()>) -> Subscription {
        let id = self.registry.borrow_mut().push(property, callback);
        trace!(
            model = std::any::type_name::<T>(),
            %id,
            property = property.unwrap_or("*"),
            "subscribe"
        );
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }
}

/// Tracks nesting of dispatches; restores the count on drop, including
/// during unwinding.
struct DispatchDepth<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DispatchDepth<'a> {
    fn enter(depth: &'a Cell<usize>, max: usize, property: &str) -> Self {
        depth.set(depth.get() + 1);
        let guard = Self { depth };
        if depth.get() > max {
            panic!(
                "dispatch depth {} exceeds limit {max} while notifying '{property}': \
                 a listener keeps mutating the state it observes",
                depth.get()
            );
        }
        guard
    }
}

impl Drop for DispatchDepth<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Handle to a registered listener.
///
/// Dropping a `Subscription` keeps the listener registered. Call
/// [`unsubscribe`](Self::unsubscribe), or convert it with
/// [`into_guard`](Self::into_guard) to tie the listener to a scope. The
/// handle holds only a weak reference and never keeps the state alive.
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Identifier of the listener.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the listener is still registered on a live state.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| {
                let registry = r.borrow();
                registry.contains(self.id)
            })
    }

    /// Remove the listener. Returns `false` if it was already removed or
    /// the state has been dropped.
    pub fn unsubscribe(self) -> bool {
        self.remove()
    }

    /// Convert into a guard that unsubscribes when dropped.
    #[must_use]
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { inner: Some(self) }
    }

    fn remove(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            debug!(id = %self.id, "subscription outlived its state");
            return false;
        };
        let detached = registry.borrow_mut().remove(self.id);
        let removed = detached.is_some();
        drop(detached);
        debug!(id = %self.id, removed, "subscription removed");
        removed
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// RAII guard that unsubscribes its listener on drop.
pub struct SubscriptionGuard {
    inner: Option<Subscription>,
}

impl SubscriptionGuard {
    /// Identifier of the guarded listener.
    #[must_use]
    pub fn id(&self) -> Option<SubscriptionId> {
        self.inner.as_ref().map(Subscription::id)
    }

    /// Give up the guard without unsubscribing.
    #[must_use]
    pub fn release(mut self) -> Option<Subscription> {
        self.inner.take()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(sub) = self.inner.take() {
            sub.remove();
        }
    }
}

impl fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("id", &self.id())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
