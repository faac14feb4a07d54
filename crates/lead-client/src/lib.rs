//! Client side of the lead REST API.
//!
//! - [`api`] - the [`LeadApi`] trait the application is written against
//! - [`http`] - [`HttpLeadApi`], its reqwest implementation
//! - [`auth`] - the credential slot and [`AuthContext`]
//! - [`analytics`] - [`EventSink`] implementations
//! - [`error`] - [`ApiError`], mapped from HTTP statuses and transport failures

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;

pub use analytics::{EventSink, JsonLinesSink, LogSink, MemorySink, NoopSink};
pub use api::{LeadApi, ListParams, LoginRequest, LoginResponse};
pub use auth::{
    AuthContext, CREDENTIAL_KEY, CredentialError, CredentialStore, FileCredentialStore,
    MemoryCredentialStore,
};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ApiError, Result};
pub use http::HttpLeadApi;
