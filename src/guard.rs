//! Navigation-time authorization check.
//!
//! DESIGN
//! ======
//! The guard is a pure decision over in-memory session state so it can run
//! synchronously before every navigation, with no network on the hot path.
//! The one-shot [`AdminExitFlag`] models the observed "suppress the redirect
//! once when leaving the admin area" transient explicitly: it is consumed by
//! every evaluation, so it can never linger past one navigation.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::cell::Cell;

/// What the router should do with a navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Proceed to the requested view.
    Allow,
    /// Send the user to the public landing page instead.
    RedirectHome,
}

/// One-shot suppression flag armed when the user leaves the admin area.
///
/// Read-once-then-clear: `take` observes the armed state at most once.
#[derive(Debug, Default)]
pub struct AdminExitFlag(Cell<bool>);

impl AdminExitFlag {
    /// Arm the flag for the next guard evaluation.
    pub fn arm(&self) {
        self.0.set(true);
    }

    /// Consume the flag, returning whether it was armed.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// Decide whether a navigation may proceed.
///
/// Protected routes require a logged-in session; everything else is open.
/// An armed [`AdminExitFlag`] suppresses exactly one redirect and is
/// consumed by every call regardless of the outcome.
pub fn decide(requires_auth: bool, is_logged_in: bool, admin_exit: &AdminExitFlag) -> RouteDecision {
    let suppress_once = admin_exit.take();
    if requires_auth && !is_logged_in && !suppress_once {
        RouteDecision::RedirectHome
    } else {
        RouteDecision::Allow
    }
}
