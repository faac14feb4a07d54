//! Page controllers.
//!
//! Each page owns its form or list state and reports to the user through
//! the [`AppContext`](crate::context::AppContext) view events.

pub mod dashboard;
pub mod detail;
pub mod editor;
pub mod lead_form;
pub mod login;
pub mod public_form;

pub use dashboard::{DashboardPage, LeadList, LeadListSource, row_cells};
pub use detail::{DetailItem, DetailSection, LeadDetailPage};
pub use editor::{EditLeadPage, NewLeadPage};
pub use login::{LoginPage, logout};
pub use public_form::PublicFormPage;
