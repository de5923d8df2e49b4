#![forbid(unsafe_code)]

//! Application stores shared between components.

use obstate_core::observable_state;

observable_state! {
    /// Customer currently using the app. One instance per session, shared
    /// by every component through an `Rc`.
    pub struct CustomerState {
        /// Given name.
        first_name: String = String::new() => FIRST_NAME, set_first_name;
        /// Family name.
        last_name: String = String::new() => LAST_NAME, set_last_name;
    }
}

impl CustomerState {
    /// "First Last", trimmed when either part is empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
            .trim()
            .to_string()
    }
}
