//! HTTP implementation of [`LeadApi`].

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use lead_model::{Credential, Lead, LeadFields, LeadId, LeadPage, LeadSummary};

use crate::api::{LeadApi, ListParams, LoginRequest, LoginResponse};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("lead-desk/", env!("CARGO_PKG_VERSION"));

/// Lead API client over reqwest.
#[derive(Debug, Clone)]
pub struct HttpLeadApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpLeadApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(
        &self,
        method: Method,
        url: Url,
        credential: Option<&Credential>,
    ) -> Result<RequestBuilder> {
        let mut request = self.client.request(method, url);
        if let Some(credential) = credential {
            // A token that is not a valid header value can never authenticate.
            let mut value =
                HeaderValue::from_str(&credential.bearer()).map_err(|_| ApiError::Unauthorized)?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }
        Ok(request)
    }

    /// Send the request and turn non-success statuses into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "lead API returned an error status");
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl LeadApi for HttpLeadApi {
    async fn login(&self, email: &str, password: &str) -> Result<Credential> {
        let url = self.config.endpoint("auth/login")?;
        tracing::debug!("Signing in at {}", url);

        let request = self
            .request(Method::POST, url, None)?
            .json(&LoginRequest { email, password });
        let response: LoginResponse = self.send_json(request).await?;

        Credential::new(response.token).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn list_leads(
        &self,
        params: &ListParams,
        credential: &Credential,
    ) -> Result<LeadPage<LeadSummary>> {
        let mut url = self.config.endpoint("leads")?;
        url.query_pairs_mut()
            .append_pair("page", &params.page.to_string())
            .append_pair("limit", &params.limit.to_string())
            .append_pair("search", &params.search);
        tracing::debug!(page = params.page, limit = params.limit, "Fetching leads");

        let request = self.request(Method::GET, url, Some(credential))?;
        self.send_json(request).await
    }

    async fn get_lead(&self, id: LeadId, credential: &Credential) -> Result<Lead> {
        let url = self.config.endpoint(&format!("leads/{id}"))?;
        tracing::debug!(%id, "Fetching lead");

        let request = self.request(Method::GET, url, Some(credential))?;
        self.send_json(request).await
    }

    async fn create_lead(
        &self,
        fields: &LeadFields,
        credential: Option<&Credential>,
    ) -> Result<Lead> {
        let url = self.config.endpoint("leads")?;
        tracing::debug!(authenticated = credential.is_some(), "Creating lead");

        let request = self.request(Method::POST, url, credential)?.json(fields);
        self.send_json(request).await
    }

    async fn update_lead(
        &self,
        id: LeadId,
        fields: &LeadFields,
        credential: &Credential,
    ) -> Result<Lead> {
        let url = self.config.endpoint(&format!("leads/{id}"))?;
        tracing::debug!(%id, "Updating lead");

        let request = self.request(Method::PUT, url, Some(credential))?.json(fields);
        self.send_json(request).await
    }

    async fn delete_lead(&self, id: LeadId, credential: &Credential) -> Result<()> {
        let url = self.config.endpoint(&format!("leads/{id}"))?;
        tracing::debug!(%id, "Deleting lead");

        let request = self.request(Method::DELETE, url, Some(credential))?;
        self.send(request).await?;
        Ok(())
    }

    async fn export_leads(&self, credential: &Credential) -> Result<Vec<u8>> {
        let url = self.config.endpoint("leads/export")?;
        tracing::debug!("Exporting leads");

        let request = self
            .request(Method::GET, url, Some(credential))?
            .header(ACCEPT, "text/csv");
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::new("http://localhost:3333").unwrap();
        let api = HttpLeadApi::new(config);
        assert!(api.is_ok());
    }
}
