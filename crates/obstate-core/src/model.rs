#![forbid(unsafe_code)]

//! The trait every observable state type implements.

use crate::error::StateError;
use crate::key::PropertyKey;
use crate::observable::{ObservableState, Subscription};

/// A state type built on [`ObservableState<Self>`].
///
/// Implementors declare their property names and expose the embedded
/// registry. Subscribers then call the provided methods on the state itself.
/// [`observable_state!`](crate::observable_state) generates the whole impl.
pub trait StateModel: Sized + 'static {
    /// Names of every observable property, in declaration order.
    const PROPERTIES: &'static [&'static str];

    /// The embedded listener registry.
    fn observable(&self) -> &ObservableState<Self>;

    /// See [`ObservableState::notify_changed`].
    fn notify_changed(&self, property: &str) {
        self.observable().notify_changed(property);
    }

    /// See [`ObservableState::subscribe_to_property_change`].
    fn subscribe_to_property_change<V>(
        &self,
        selector: PropertyKey<Self, V>,
        callback: impl Fn() + 'static,
    ) -> Result<Subscription, StateError> {
        self.observable()
            .subscribe_to_property_change(selector, callback)
    }

    /// See [`ObservableState::subscribe_to_property_named`].
    fn subscribe_to_property_named(
        &self,
        name: &str,
        callback: impl Fn() + 'static,
    ) -> Result<Subscription, StateError> {
        self.observable().subscribe_to_property_named(name, callback)
    }

    /// See [`ObservableState::subscribe_to_any_change`].
    fn subscribe_to_any_change(&self, callback: impl Fn() + 'static) -> Subscription {
        self.observable().subscribe_to_any_change(callback)
    }
}
