//! Lead records and wire types for Lead Desk.
//!
//! Everything here mirrors the JSON the lead API speaks: Portuguese field
//! names on the wire (`nome`, `telefone`, `dataNascimento`, ...) mapped onto
//! plain Rust structs. No I/O lives in this crate.

pub mod credential;
pub mod error;
pub mod fields;
pub mod lead;
pub mod page;
pub mod tracking;

pub use credential::Credential;
pub use error::{ModelError, Result};
pub use lead::{Lead, LeadFields, LeadId, LeadSummary};
pub use page::LeadPage;
pub use tracking::TrackingParams;
