//! Gate for screens that need a signed-in user.

use crate::context::AppContext;
use crate::events::{Route, ViewEvent};

/// Decision of a [`RouteGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No decision yet; the front end shows a full-screen loader.
    Verifying,
    /// No credential; the user was sent to the login screen.
    Redirect,
    /// A credential is present; the protected screen may render.
    Render,
}

/// Checks for a credential once and remembers the answer.
///
/// Only presence is checked. An expired credential is detected later, when
/// the server rejects it.
#[derive(Debug)]
pub struct RouteGuard {
    context: AppContext,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            state: GuardState::Verifying,
        }
    }

    /// Decide on first call and signal the outcome; later calls return the
    /// same decision without signaling again.
    pub fn authorize(&mut self) -> GuardState {
        if self.state != GuardState::Verifying {
            return self.state;
        }

        if self.context.auth.is_authenticated() {
            self.state = GuardState::Render;
            self.context.events.emit(ViewEvent::GuardRendered);
        } else {
            tracing::debug!("no credential; redirecting to login");
            self.state = GuardState::Redirect;
            self.context.events.navigate(Route::Login);
        }
        self.state
    }

    pub fn state(&self) -> GuardState {
        self.state
    }
}
