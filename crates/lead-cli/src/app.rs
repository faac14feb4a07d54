//! Wiring of the page controllers for one command run.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use lead_admin::events::drain;
use lead_admin::guard::{GuardState, RouteGuard};
use lead_admin::pages::{LeadList, LeadListSource};
use lead_admin::{AppContext, ListCoordinator, ViewEvent, ViewEvents};
use lead_client::{
    ApiError, AuthContext, CredentialStore, EventSink, HttpLeadApi, JsonLinesSink, LeadApi,
    LogSink,
};

use crate::logging::log_data_enabled;
use crate::settings::Settings;

/// API client, application context and settings shared by the commands.
pub struct App {
    api: Arc<dyn LeadApi>,
    context: AppContext,
    settings: Settings,
    events: UnboundedReceiver<ViewEvent>,
}

impl App {
    pub fn new(api: Arc<dyn LeadApi>, auth: AuthContext, settings: Settings) -> Self {
        let (events, rx) = ViewEvents::channel();
        Self {
            api,
            context: AppContext::new(auth, events),
            settings,
            events: rx,
        }
    }

    /// Build the HTTP client from `settings`.
    pub fn connect(settings: Settings, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let api = HttpLeadApi::new(settings.client_config()?)?;
        tracing::debug!(api_url = %settings.api_url, "lead API client ready");
        Ok(Self::new(Arc::new(api), AuthContext::new(store), settings))
    }

    pub fn api(&self) -> Arc<dyn LeadApi> {
        Arc::clone(&self.api)
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// View events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        drain(&mut self.events)
    }

    /// Run the route guard of the admin screens.
    pub fn is_signed_in(&self) -> bool {
        RouteGuard::new(self.context.clone()).authorize() == GuardState::Render
    }

    /// Dashboard list with the configured page size.
    pub fn lead_list(&self) -> LeadList {
        ListCoordinator::new(
            LeadListSource::new(self.api()),
            self.context.clone(),
            self.settings.list_config(),
        )
    }

    /// Analytics data layer: the configured JSON lines file, or the log.
    pub fn analytics_sink(&self) -> std::io::Result<Arc<dyn EventSink>> {
        match &self.settings.analytics_log {
            Some(path) => Ok(Arc::new(JsonLinesSink::open(path)?)),
            None => Ok(Arc::new(LogSink::new(log_data_enabled()))),
        }
    }
}
