#![forbid(unsafe_code)]

//! Declarative definition of observable state types.

/// Declare an observable state struct.
///
/// Each property is written as
/// `name: Type = initial_value => KEY_CONST, setter_name;`. The macro
/// generates:
///
/// - the struct, with one `RefCell` backing cell per property and an embedded
///   [`ObservableState`](crate::ObservableState);
/// - a typed [`PropertyKey`](crate::PropertyKey) constant per property;
/// - a cloning getter named after the property and a setter that calls
///   [`ObservableState::set_and_notify`](crate::ObservableState::set_and_notify);
/// - `new()`, `with_config()`, `Default`, `Debug` and the
///   [`StateModel`](crate::StateModel) impl.
///
/// Property types must be `Clone + PartialEq + Debug`.
///
/// # Example
///
/// ```
/// use obstate_core::{observable_state, StateModel};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// observable_state! {
///     pub struct CounterState {
///         count: u32 = 0 => COUNT, set_count;
///         label: String = String::from("clicks") => LABEL, set_label;
///     }
/// }
///
/// let state = CounterState::new();
/// let renders = Rc::new(Cell::new(0));
/// let renders_clone = Rc::clone(&renders);
/// state
///     .subscribe_to_property_change(CounterState::COUNT, move || {
///         renders_clone.set(renders_clone.get() + 1)
///     })
///     .unwrap();
///
/// state.set_count(1);
/// state.set_label("taps".to_string());
/// assert_eq!(renders.get(), 1);
/// assert_eq!(state.count(), 1);
/// ```
#[macro_export]
macro_rules! observable_state {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty = $init:expr => $key:ident, $setter:ident;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            __observable: $crate::ObservableState<$name>,
            $( $field: ::std::cell::RefCell<$ty>, )*
        }

        #[allow(dead_code)]
        impl $name {
            $(
                #[doc = concat!("Typed key for the `", stringify!($field), "` property.")]
                $vis const $key: $crate::PropertyKey<$name, $ty> =
                    $crate::PropertyKey::new(stringify!($field));
            )*

            /// Create the state with its initial values and the default
            /// configuration.
            #[must_use]
            $vis fn new() -> Self {
                Self::with_config($crate::StateConfig::default())
            }

            /// Create the state with its initial values and `config`.
            #[must_use]
            $vis fn with_config(config: $crate::StateConfig) -> Self {
                Self {
                    __observable: $crate::ObservableState::with_config(config),
                    $( $field: ::std::cell::RefCell::new($init), )*
                }
            }

            $(
                $(#[$fmeta])*
                #[must_use]
                $vis fn $field(&self) -> $ty {
                    ::std::clone::Clone::clone(&*self.$field.borrow())
                }

                #[doc = concat!(
                    "Set `", stringify!($field),
                    "` and notify its listeners. Returns whether a notification was raised."
                )]
                $vis fn $setter(&self, value: $ty) -> bool {
                    self.__observable
                        .set_and_notify(&self.$field, value, Self::$key)
                }
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    $( .field(stringify!($field), &*self.$field.borrow()) )*
                    .field("listeners", &self.__observable.listener_count())
                    .finish()
            }
        }

        impl $crate::StateModel for $name {
            const PROPERTIES: &'static [&'static str] = &[$( stringify!($field) ),*];

            fn observable(&self) -> &$crate::ObservableState<Self> {
                &self.__observable
            }
        }
    };
}
