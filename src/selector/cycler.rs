//! Focus decision for a MatchSet
//!
//! Mirrors `kwinActivateClient` in the rendered script: signal first,
//! then activate, toggle or cycle.

use crate::core::workspace::{WindowHandle, WindowId, Workspace};
use crate::decision::Decision;

use super::Matcher;

/// What the cycler does with the host once the MatchSet is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing matched
    Signal,
    Activate(WindowId),
    SetMinimized(WindowId, bool),
    /// The only match is already active and toggling is off
    Nothing,
}

/// Pick the next action for `matches` given the active window
pub fn decide(matches: &[&WindowHandle], active: Option<WindowId>, toggle_on_active: bool) -> Action {
    match matches {
        [] => Action::Signal,
        [only] => {
            if active != Some(only.id) {
                Action::Activate(only.id)
            } else if toggle_on_active {
                Action::SetMinimized(only.id, !only.minimized)
            } else {
                Action::Nothing
            }
        }
        _ => {
            let active_is_match = active.is_some_and(|id| matches.iter().any(|w| w.id == id));

            let mut sorted = matches.to_vec();
            // Stable sort keeps enumeration order between equal stacking orders
            sorted.sort_by_key(|w| w.stacking_order);

            let target = if active_is_match {
                sorted.first()
            } else {
                sorted.last()
            };
            target.map_or(Action::Nothing, |w| Action::Activate(w.id))
        }
    }
}

/// Run one selection and focus decision against `workspace`.
///
/// When `callback` is set the decision is reported through it before any
/// window is touched.
pub fn activate_or_signal<W: Workspace + ?Sized>(
    workspace: &mut W,
    matcher: &Matcher,
    toggle_on_active: bool,
    callback: Option<&str>,
) -> Decision {
    let action = {
        let matches = matcher.select_in(&*workspace);
        decide(&matches, workspace.active_window(), toggle_on_active)
    };

    let decision = match action {
        Action::Signal => Decision::NoMatch,
        _ => Decision::Handled,
    };

    if let Some(address) = callback.filter(|a| !a.is_empty()) {
        workspace.call_back(address, decision);
    }

    match action {
        Action::Activate(id) => workspace.set_active_window(id),
        Action::SetMinimized(id, minimized) => workspace.set_minimized(id, minimized),
        Action::Signal | Action::Nothing => {}
    }

    decision
}
