#![forbid(unsafe_code)]

//! Render loop driving the home page until no re-render is pending.

use std::cell::Cell;
use std::rc::Rc;

use obstate_core::{StateError, StateModel};
use tracing::{debug, info, warn};

use crate::components::{Component, HomePage};
use crate::store::CustomerState;

/// Upper bound on frames per run; a component that requests a render from
/// every render would otherwise never settle.
pub const MAX_FRAMES: usize = 16;

/// Outcome of one [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Output of every home page render, in order.
    pub frames: Vec<String>,
    /// Re-render requests the home page received (state-driven plus
    /// lifecycle).
    pub render_requests: u32,
    /// Change events observed on the customer store.
    pub state_changes: u32,
    /// Whether the loop stopped at [`MAX_FRAMES`].
    pub truncated: bool,
}

/// Mount the home page against `customer` and render until it settles.
///
/// The weather panel the page mounts writes `first_name` / `last_name`.
pub fn run(
    customer: &Rc<CustomerState>,
    first_name: &str,
    last_name: &str,
) -> Result<RunReport, StateError> {
    let changes = Rc::new(Cell::new(0u32));
    let changes_clone = Rc::clone(&changes);
    let audit = customer
        .subscribe_to_any_change(move || changes_clone.set(changes_clone.get() + 1))
        .into_guard();

    let mut home = HomePage::new(Rc::clone(customer), first_name, last_name);
    home.on_initialized()?;

    let mut frames = vec![home.render()?];
    home.on_after_render(true);

    let mut truncated = false;
    loop {
        let pending = home.tracker().take_pending();
        if pending == 0 {
            break;
        }
        if frames.len() >= MAX_FRAMES {
            warn!(frames = frames.len(), pending, "render loop did not settle");
            truncated = true;
            break;
        }
        debug!(component = home.name(), pending, "re-rendering");
        frames.push(home.render()?);
        home.on_after_render(false);
    }

    home.dispose();
    drop(audit);

    let report = RunReport {
        frames,
        render_requests: home.tracker().total(),
        state_changes: changes.get(),
        truncated,
    };
    info!(
        frames = report.frames.len(),
        render_requests = report.render_requests,
        state_changes = report.state_changes,
        "run complete"
    );
    Ok(report)
}
