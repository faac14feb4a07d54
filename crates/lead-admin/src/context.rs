//! Collaborators shared by every controller.

use lead_client::{ApiError, AuthContext};

use crate::busy::BusyIndicator;
use crate::events::{Route, ViewEvents};

/// Shown when the server rejects the credential.
pub const SESSION_EXPIRED: &str = "Sessão expirada. Faça login novamente.";

/// Authentication context, view event stream and busy indicator.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub auth: AuthContext,
    pub events: ViewEvents,
    pub busy: BusyIndicator,
}

impl AppContext {
    pub fn new(auth: AuthContext, events: ViewEvents) -> Self {
        Self {
            auth,
            events,
            busy: BusyIndicator::new(),
        }
    }

    /// Drop the credential and send the user to the login screen.
    pub fn expire_session(&self) {
        tracing::info!("session expired; signing out");
        if let Err(e) = self.auth.sign_out() {
            tracing::warn!(error = %e, "failed to clear credential");
        }
        self.events.error(SESSION_EXPIRED);
        self.events.navigate(Route::Login);
    }

    /// Report a failed operation.
    ///
    /// A rejected credential expires the session; anything else shows
    /// `message` and leaves the session alone.
    pub fn report_failure(&self, err: &ApiError, message: &str) {
        if err.is_unauthorized() {
            self.expire_session();
        } else {
            tracing::warn!(error = %err, "{message}");
            self.events.error(message);
        }
    }
}
