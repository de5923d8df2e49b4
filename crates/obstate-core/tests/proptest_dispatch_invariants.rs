#![forbid(unsafe_code)]

//! Property-based invariant tests for listener dispatch.
//!
//! For arbitrary sequences of writes against a two-property state:
//!
//! 1. A property listener fires exactly once per value-changing write of its
//!    property and never for the other property.
//! 2. An any-change listener fires exactly once per value-changing write.
//! 3. Under `Always`, every write notifies.
//! 4. Unsubscribed listeners receive nothing after removal.
//! 5. Dispatch order equals registration order.

use obstate_core::{NotifyPolicy, StateConfig, StateModel, observable_state};
use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

observable_state! {
    struct PairState {
        left: u8 = 0 => LEFT, set_left;
        right: u8 = 0 => RIGHT, set_right;
    }
}

#[derive(Debug, Clone, Copy)]
enum Write {
    Left(u8),
    Right(u8),
}

// ── Strategies ────────────────────────────────────────────────────────────

fn write_strategy() -> impl Strategy<Value = Write> {
    prop_oneof![
        (0u8..4).prop_map(Write::Left),
        (0u8..4).prop_map(Write::Right),
    ]
}

fn writes_strategy(max_len: usize) -> impl Strategy<Value = Vec<Write>> {
    proptest::collection::vec(write_strategy(), 0..=max_len)
}

fn counter() -> (Rc<Cell<usize>>, impl Fn() + 'static) {
    let count = Rc::new(Cell::new(0usize));
    let count_clone = Rc::clone(&count);
    (count, move || count_clone.set(count_clone.get() + 1))
}

/// Expected (left changes, right changes) by replaying writes against plain
/// values.
fn expected_changes(writes: &[Write]) -> (usize, usize) {
    let (mut left, mut right) = (0u8, 0u8);
    let (mut left_changes, mut right_changes) = (0, 0);
    for w in writes {
        match *w {
            Write::Left(v) if v != left => {
                left = v;
                left_changes += 1;
            }
            Write::Right(v) if v != right => {
                right = v;
                right_changes += 1;
            }
            _ => {}
        }
    }
    (left_changes, right_changes)
}

fn apply(state: &PairState, writes: &[Write]) {
    for w in writes {
        match *w {
            Write::Left(v) => {
                state.set_left(v);
            }
            Write::Right(v) => {
                state.set_right(v);
            }
        }
    }
}

proptest! {
    #[test]
    fn listeners_count_real_changes(writes in writes_strategy(64)) {
        let state = PairState::new();
        let (left_hits, on_left) = counter();
        let (right_hits, on_right) = counter();
        let (any_hits, on_any) = counter();
        state.subscribe_to_property_change(PairState::LEFT, on_left).unwrap();
        state.subscribe_to_property_change(PairState::RIGHT, on_right).unwrap();
        state.subscribe_to_any_change(on_any);

        apply(&state, &writes);

        let (left_changes, right_changes) = expected_changes(&writes);
        prop_assert_eq!(left_hits.get(), left_changes);
        prop_assert_eq!(right_hits.get(), right_changes);
        prop_assert_eq!(any_hits.get(), left_changes + right_changes);
    }

    #[test]
    fn always_policy_counts_every_write(writes in writes_strategy(64)) {
        let state = PairState::with_config(
            StateConfig::new().with_notify_policy(NotifyPolicy::Always),
        );
        let (any_hits, on_any) = counter();
        state.subscribe_to_any_change(on_any);

        apply(&state, &writes);
        prop_assert_eq!(any_hits.get(), writes.len());
    }

    #[test]
    fn unsubscribed_listener_stays_silent(
        before in writes_strategy(16),
        after in writes_strategy(16),
    ) {
        let state = PairState::new();
        let (hits, on_any) = counter();
        let sub = state.subscribe_to_any_change(on_any);

        apply(&state, &before);
        let seen = hits.get();
        prop_assert!(sub.unsubscribe());

        apply(&state, &after);
        prop_assert_eq!(hits.get(), seen);
    }

    #[test]
    fn dispatch_follows_registration_order(kinds in proptest::collection::vec(any::<bool>(), 1..12)) {
        let state = PairState::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (idx, any_change) in kinds.iter().enumerate() {
            let log = Rc::clone(&log);
            let push = move || log.borrow_mut().push(idx);
            if *any_change {
                state.subscribe_to_any_change(push);
            } else {
                state.subscribe_to_property_change(PairState::LEFT, push).unwrap();
            }
        }

        state.set_left(1);
        let expected: Vec<usize> = (0..kinds.len()).collect();
        prop_assert_eq!(&*log.borrow(), &expected);
    }
}
