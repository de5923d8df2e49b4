#![forbid(unsafe_code)]

//! Observable state containers for component-based UIs.
//!
//! # Role
//! `obstate-core` lets a state type expose named properties and notify
//! observers when one property, or any property, changes. UI components
//! subscribe during initialization with a re-render callback and only
//! re-render when the property they read actually changes.
//!
//! # Primary pieces
//! - [`ObservableState`]: listener registry and synchronous dispatch,
//!   embedded in every state type.
//! - [`StateModel`]: trait a state type implements; subscribers call the
//!   subscribe methods on the state itself.
//! - [`PropertyKey`]: typed selector for one property, so a rename breaks
//!   subscribers at compile time instead of silently never firing.
//! - [`observable_state!`]: declares a state struct with backing cells,
//!   getters, notifying setters and keys.
//! - [`StateConfig`]: notification policy and re-entrancy bound.
//!
//! # Invariants
//!
//! 1. Listeners fire synchronously, in registration order, on the thread
//!    that called the setter.
//! 2. With the default [`NotifyPolicy::OnChange`], writing an equal value
//!    raises nothing.
//! 3. Subscribing never replays earlier changes.
//! 4. A selector that does not name a declared property is rejected at
//!    subscription time with [`StateError::InvalidSelector`].

mod macros;

pub mod config;
pub mod error;
pub mod key;
pub mod model;
pub mod observable;

pub use config::{NotifyPolicy, StateConfig};
pub use error::StateError;
pub use key::PropertyKey;
pub use model::StateModel;
pub use observable::{ObservableState, Subscription, SubscriptionGuard, SubscriptionId};
