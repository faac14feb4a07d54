//! The lead API as consumed by the application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lead_model::{Credential, Lead, LeadFields, LeadId, LeadPage, LeadSummary};

use crate::error::Result;

/// Query of the paginated list endpoint. `page` is 1-based on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListParams {
    pub page: usize,
    pub limit: usize,
    pub search: String,
}

impl ListParams {
    pub fn new(page: usize, limit: usize, search: impl Into<String>) -> Self {
        Self {
            page,
            limit,
            search: search.into(),
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Operations of the lead REST API.
///
/// Authenticated operations take the credential explicitly; only the public
/// lead submission may run without one.
#[async_trait]
pub trait LeadApi: Send + Sync {
    /// Exchange email and password for a credential.
    async fn login(&self, email: &str, password: &str) -> Result<Credential>;

    /// One page of leads.
    async fn list_leads(
        &self,
        params: &ListParams,
        credential: &Credential,
    ) -> Result<LeadPage<LeadSummary>>;

    async fn get_lead(&self, id: LeadId, credential: &Credential) -> Result<Lead>;

    /// Create a lead. The public form posts without a credential.
    async fn create_lead(
        &self,
        fields: &LeadFields,
        credential: Option<&Credential>,
    ) -> Result<Lead>;

    async fn update_lead(
        &self,
        id: LeadId,
        fields: &LeadFields,
        credential: &Credential,
    ) -> Result<Lead>;

    async fn delete_lead(&self, id: LeadId, credential: &Credential) -> Result<()>;

    /// Every lead as CSV bytes.
    async fn export_leads(&self, credential: &Credential) -> Result<Vec<u8>>;
}
