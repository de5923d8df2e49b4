#![forbid(unsafe_code)]

//! Typed property keys.
//!
//! A [`PropertyKey<T, V>`] names one property of state type `T` whose value
//! type is `V`. Keys are produced once per property (normally by
//! [`observable_state!`](crate::observable_state)) and passed to the
//! subscribe APIs instead of a raw string, so renaming a property breaks the
//! subscriber at compile time. Dispatch itself stays name-based.

use std::fmt;
use std::marker::PhantomData;

/// Typed reference to a single property of `T`.
pub struct PropertyKey<T, V> {
    name: &'static str,
    _marker: PhantomData<fn(&T) -> V>,
}

impl<T, V> PropertyKey<T, V> {
    /// Create a key for the property declared as `name`.
    ///
    /// The name is checked against the state's declared properties when the
    /// key is used to subscribe, not here.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The declared property name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: `T` and `V` need not be `Clone`/`Debug` themselves.
impl<T, V> Clone for PropertyKey<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for PropertyKey<T, V> {}

impl<T, V> PartialEq for PropertyKey<T, V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T, V> Eq for PropertyKey<T, V> {}

impl<T, V> fmt::Debug for PropertyKey<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyKey").field(&self.name).finish()
    }
}

impl<T, V> fmt::Display for PropertyKey<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
