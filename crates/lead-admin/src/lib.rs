//! Application core of Lead Desk.
//!
//! Front-end agnostic: controllers keep their state in plain structs and
//! talk to the user through [`ViewEvent`]s (notifications and navigation)
//! and the [`BusyIndicator`].
//!
//! - [`list`] - generic paginated list coordination with debounced search
//! - [`guard`] - route guard for signed-in screens
//! - [`pages`] - public form, login, dashboard, new/edit/detail lead

pub mod analytics;
pub mod busy;
pub mod context;
pub mod error;
pub mod events;
pub mod export;
pub mod format;
pub mod guard;
pub mod list;
pub mod pages;

pub use busy::{BusyGuard, BusyIndicator};
pub use context::{AppContext, SESSION_EXPIRED};
pub use error::{AdminError, Result};
pub use events::{Level, Notification, Route, ViewEvent, ViewEvents};
pub use export::{DirectoryExportSink, ExportSink, export_file_name};
pub use guard::{GuardState, RouteGuard};
pub use list::{
    DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE, FetchOutcome, ListConfig, ListCoordinator,
    ListMessages, ListQuery, ListResult, ListSource,
};
