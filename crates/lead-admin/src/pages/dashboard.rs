//! Lead dashboard: the list coordinator over the lead API.

use std::sync::Arc;

use async_trait::async_trait;

use lead_client::{ApiError, LeadApi, ListParams};
use lead_model::{Credential, LeadId, LeadPage, LeadSummary};

use crate::context::AppContext;
use crate::error::Result;
use crate::format::display_date;
use crate::guard::{GuardState, RouteGuard};
use crate::list::{FetchOutcome, ListConfig, ListCoordinator, ListSource};
use crate::pages::login::logout;

/// [`ListSource`] backed by [`LeadApi`].
#[derive(Clone)]
pub struct LeadListSource {
    api: Arc<dyn LeadApi>,
}

impl LeadListSource {
    pub fn new(api: Arc<dyn LeadApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for LeadListSource {
    type Row = LeadSummary;
    type Id = LeadId;

    fn row_id(row: &LeadSummary) -> LeadId {
        row.id
    }

    fn row_label(row: &LeadSummary) -> String {
        row.nome.clone()
    }

    async fn fetch(
        &self,
        params: &ListParams,
        credential: &Credential,
    ) -> std::result::Result<LeadPage<LeadSummary>, ApiError> {
        self.api.list_leads(params, credential).await
    }

    async fn delete(
        &self,
        id: LeadId,
        credential: &Credential,
    ) -> std::result::Result<(), ApiError> {
        self.api.delete_lead(id, credential).await
    }

    async fn export(&self, credential: &Credential) -> std::result::Result<Vec<u8>, ApiError> {
        self.api.export_leads(credential).await
    }
}

pub type LeadList = ListCoordinator<LeadListSource>;

/// Table cells of a dashboard row: name, email, phone, creation date.
pub fn row_cells(row: &LeadSummary) -> [String; 4] {
    [
        row.nome.clone(),
        row.email.clone(),
        row.telefone.clone(),
        display_date(&row.created_at),
    ]
}

/// "Dashboard de Leads"
pub struct DashboardPage {
    guard: RouteGuard,
    list: LeadList,
}

impl DashboardPage {
    pub fn new(api: Arc<dyn LeadApi>, context: AppContext, config: ListConfig) -> Self {
        Self {
            guard: RouteGuard::new(context.clone()),
            list: ListCoordinator::new(LeadListSource::new(api), context, config),
        }
    }

    /// Pass the route guard and load the first page.
    ///
    /// Returns `None` when the user was redirected to login.
    pub async fn open(&mut self) -> Option<FetchOutcome> {
        match self.guard.authorize() {
            GuardState::Render => Some(self.list.fetch().await),
            GuardState::Redirect | GuardState::Verifying => None,
        }
    }

    pub fn list(&self) -> &LeadList {
        &self.list
    }

    /// "Sair"
    pub fn logout(&self) -> Result<()> {
        logout(self.list.context())
    }
}
