//! View events: notifications and navigation requests for the front end.

use std::fmt;

use tokio::sync::mpsc;

use lead_model::LeadId;

/// Screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    PublicForm,
    Login,
    Dashboard,
    NewLead,
    LeadDetail(LeadId),
    EditLead(LeadId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublicForm => f.write_str("/"),
            Self::Login => f.write_str("/login"),
            Self::Dashboard => f.write_str("/admin/dashboard"),
            Self::NewLead => f.write_str("/admin/dashboard/lead/novo"),
            Self::LeadDetail(id) => write!(f, "/admin/dashboard/lead/{id}"),
            Self::EditLead(id) => write!(f, "/admin/dashboard/lead/{id}/editar"),
        }
    }
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Notify(Notification),
    Navigate(Route),
    /// The route guard allowed the protected screen to render.
    GuardRendered,
}

/// Sending half of the view event stream.
///
/// Events sent after the receiver is gone are dropped.
#[derive(Debug, Clone)]
pub struct ViewEvents {
    tx: mpsc::UnboundedSender<ViewEvent>,
}

impl ViewEvents {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ViewEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: ViewEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("view event dropped; no receiver");
        }
    }

    pub fn notify(&self, level: Level, message: impl Into<String>) {
        self.emit(ViewEvent::Notify(Notification {
            level,
            message: message.into(),
        }));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Level::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Level::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Level::Info, message);
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.emit(ViewEvent::Navigate(route));
    }
}

/// Collect every event already queued on `rx`.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_render_as_paths() {
        assert_eq!(Route::Dashboard.to_string(), "/admin/dashboard");
        assert_eq!(
            Route::EditLead(LeadId(4)).to_string(),
            "/admin/dashboard/lead/4/editar"
        );
    }

    #[test]
    fn events_arrive_in_order() {
        let (events, mut rx) = ViewEvents::channel();
        events.success("ok");
        events.navigate(Route::Login);
        assert_eq!(
            drain(&mut rx),
            vec![
                ViewEvent::Notify(Notification {
                    level: Level::Success,
                    message: "ok".to_string()
                }),
                ViewEvent::Navigate(Route::Login),
            ]
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (events, rx) = ViewEvents::channel();
        drop(rx);
        events.error("nobody listens");
    }
}
