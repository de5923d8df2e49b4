#![forbid(unsafe_code)]

//! End-to-end subscription scenarios against a declared customer state.
//!
//! These tests validate that:
//! - property listeners fire once per real change and ignore other properties
//! - any-change listeners see every change
//! - equal writes are silent under the default policy
//! - invalid selectors register nothing
//! - a shared `Rc` handle behaves like the single owned instance

use obstate_core::{
    NotifyPolicy, PropertyKey, StateConfig, StateError, StateModel, observable_state,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{Level, info};

observable_state! {
    /// Customer details shared by several components.
    pub struct CustomerState {
        first_name: String = String::new() => FIRST_NAME, set_first_name;
        last_name: String = String::new() => LAST_NAME, set_last_name;
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

/// Shared event log; each listener pushes its tag.
fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> impl Fn() + 'static {
    let log = Rc::clone(log);
    move || log.borrow_mut().push(tag)
}

fn count(log: &Rc<RefCell<Vec<&'static str>>>, tag: &str) -> usize {
    log.borrow().iter().filter(|t| **t == tag).count()
}

#[test]
fn customer_walkthrough() {
    init_tracing();
    let state = CustomerState::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    state
        .subscribe_to_property_change(CustomerState::FIRST_NAME, recorder(&log, "A"))
        .unwrap();

    state.set_first_name("John".to_string());
    assert_eq!(count(&log, "A"), 1);

    state.set_last_name("Dereck".to_string());
    assert_eq!(count(&log, "A"), 1);

    state.subscribe_to_any_change(recorder(&log, "B"));

    log.borrow_mut().clear();
    state.set_first_name("Jane".to_string());
    assert_eq!(*log.borrow(), vec!["A", "B"]);
    info!(state = ?state, "walkthrough complete");
}

#[test]
fn repeated_equal_write_fires_once() {
    init_tracing();
    let state = CustomerState::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    state
        .subscribe_to_property_change(CustomerState::FIRST_NAME, recorder(&log, "A"))
        .unwrap();

    assert!(state.set_first_name("John".to_string()));
    assert!(!state.set_first_name("John".to_string()));
    assert_eq!(count(&log, "A"), 1);
}

#[test]
fn always_policy_fires_on_every_write() {
    let state =
        CustomerState::with_config(StateConfig::new().with_notify_policy(NotifyPolicy::Always));
    let log = Rc::new(RefCell::new(Vec::new()));
    state
        .subscribe_to_property_change(CustomerState::FIRST_NAME, recorder(&log, "A"))
        .unwrap();

    state.set_first_name("John".to_string());
    state.set_first_name("John".to_string());
    assert_eq!(count(&log, "A"), 2);
}

#[test]
fn multiple_listeners_fire_in_registration_order() {
    let state = CustomerState::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        state
            .subscribe_to_property_change(CustomerState::LAST_NAME, recorder(&log, tag))
            .unwrap();
    }

    state.set_last_name("Dereck".to_string());
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn no_replay_for_late_subscribers() {
    let state = CustomerState::new();
    state.set_first_name("John".to_string());

    let log = Rc::new(RefCell::new(Vec::new()));
    state
        .subscribe_to_property_change(CustomerState::FIRST_NAME, recorder(&log, "late"))
        .unwrap();
    state.subscribe_to_any_change(recorder(&log, "late-any"));
    assert!(log.borrow().is_empty());
}

#[test]
fn computed_selector_is_rejected() {
    init_tracing();
    let state = CustomerState::new();
    let full_name: PropertyKey<CustomerState, String> = PropertyKey::new("full_name");
    let log = Rc::new(RefCell::new(Vec::new()));

    let err = state
        .subscribe_to_property_change(full_name, recorder(&log, "never"))
        .unwrap_err();
    match &err {
        StateError::InvalidSelector { property, model } => {
            assert_eq!(property, "full_name");
            assert!(model.ends_with("CustomerState"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(state.observable().listener_count(), 0);

    state.set_first_name("John".to_string());
    assert!(log.borrow().is_empty());
}

#[test]
fn shared_handle_sees_mutations_from_any_holder() {
    let owner = Rc::new(CustomerState::new());
    let home = Rc::clone(&owner);
    let weather = Rc::clone(&owner);
    let log = Rc::new(RefCell::new(Vec::new()));

    home.subscribe_to_property_change(CustomerState::FIRST_NAME, recorder(&log, "home"))
        .unwrap();

    weather.set_first_name("John".to_string());
    weather.set_last_name("Dereck".to_string());

    assert_eq!(*log.borrow(), vec!["home"]);
    assert_eq!(owner.first_name(), "John");
    assert_eq!(owner.last_name(), "Dereck");
}

#[test]
fn guard_scoped_to_component_lifetime() {
    let state = CustomerState::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let guard = state
        .subscribe_to_property_change(CustomerState::FIRST_NAME, recorder(&log, "mounted"))
        .unwrap()
        .into_guard();
    state.set_first_name("John".to_string());
    drop(guard);
    state.set_first_name("Jane".to_string());

    assert_eq!(count(&log, "mounted"), 1);
    assert_eq!(state.observable().listener_count(), 0);
}
