#![forbid(unsafe_code)]

//! Sample application for `obstate-core`.
//!
//! A single [`store::CustomerState`] is shared by a home page that re-renders
//! when the customer's first name changes and a weather panel that writes the
//! name while initializing. [`app::run`] drives the render loop until no
//! component asks to render again.

pub mod app;
pub mod cli;
pub mod components;
pub mod store;
