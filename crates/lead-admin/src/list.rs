//! Paginated, searchable list view coordination.
//!
//! [`ListCoordinator`] owns the query (page, page size, search term) and the
//! last applied result of a [`ListSource`]. Search edits are debounced on a
//! tokio timer; every fetch is numbered and only the newest issued request
//! may change the result, so a slow old response can never overwrite a
//! newer one.
//!
//! Methods that schedule work ([`ListCoordinator::set_search_term`]) must be
//! called from within a tokio runtime.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use lead_client::{ApiError, ListParams};
use lead_model::{Credential, LeadPage};

use crate::context::AppContext;
use crate::error::{AdminError, Result};
use crate::export::{ExportSink, export_file_name};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Quiet period after the last search edit before a fetch is issued.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Injected retrieval, delete and export operations.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Row: Clone + Send + Sync + 'static;
    type Id: Copy + PartialEq + fmt::Display + Send + Sync + 'static;

    fn row_id(row: &Self::Row) -> Self::Id;

    /// Name of the row in notifications.
    fn row_label(row: &Self::Row) -> String;

    async fn fetch(
        &self,
        params: &ListParams,
        credential: &Credential,
    ) -> std::result::Result<LeadPage<Self::Row>, ApiError>;

    async fn delete(
        &self,
        id: Self::Id,
        credential: &Credential,
    ) -> std::result::Result<(), ApiError>;

    async fn export(&self, credential: &Credential) -> std::result::Result<Vec<u8>, ApiError>;
}

/// Current page, page size and applied search term. `page_index` is 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page_index: usize,
    pub page_size: usize,
    pub search_term: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search_term: String::new(),
        }
    }
}

impl ListQuery {
    /// Wire parameters; pages are 1-based on the wire.
    pub fn params(&self) -> ListParams {
        ListParams::new(self.page_index + 1, self.page_size, self.search_term.clone())
    }
}

/// Rows of the current page plus the page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult<R> {
    pub rows: Vec<R>,
    /// Always at least 1.
    pub total_pages: usize,
}

impl<R> Default for ListResult<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total_pages: 1,
        }
    }
}

impl<R> From<LeadPage<R>> for ListResult<R> {
    fn from(page: LeadPage<R>) -> Self {
        Self {
            rows: page.leads,
            total_pages: page.total_pages.max(1),
        }
    }
}

/// Notification texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMessages {
    /// Noun used in the delete confirmation.
    pub item: String,
    pub delete_failed: String,
    pub export_started: String,
    pub export_failed: String,
}

impl Default for ListMessages {
    fn default() -> Self {
        Self {
            item: "Lead".to_string(),
            delete_failed: "Erro ao deletar lead.".to_string(),
            export_started: "Download iniciado!".to_string(),
            export_failed: "Ocorreu um erro ao exportar os leads.".to_string(),
        }
    }
}

impl ListMessages {
    pub fn deleted(&self, label: &str) -> String {
        format!("{} \"{label}\" deletado com sucesso!", self.item)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub page_size: usize,
    pub search_debounce: Duration,
    pub messages: ListMessages,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            messages: ListMessages::default(),
        }
    }
}

/// What became of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response is now the current result.
    Applied,
    /// A newer request was issued before this one completed.
    Superseded,
    /// The newest request failed; the rows were cleared and the failure
    /// reported.
    Failed(ApiError),
}

struct State<R> {
    query: ListQuery,
    search_input: String,
    result: ListResult<R>,
    /// Sequence number of the newest issued fetch.
    issued: u64,
    in_flight: usize,
    search_generation: u64,
    pending_search: Option<JoinHandle<()>>,
}

struct Inner<S: ListSource> {
    source: S,
    context: AppContext,
    config: ListConfig,
    state: Mutex<State<S::Row>>,
}

enum Settle {
    Done(FetchOutcome),
    StepBack,
}

/// Cloneable handle on one list view.
pub struct ListCoordinator<S: ListSource> {
    inner: Arc<Inner<S>>,
}

impl<S: ListSource> Clone for ListCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListSource> ListCoordinator<S> {
    /// Create a coordinator. Nothing is fetched until asked.
    ///
    /// A page size of 0 in `config` is treated as 1.
    pub fn new(source: S, context: AppContext, config: ListConfig) -> Self {
        let query = ListQuery {
            page_size: config.page_size.max(1),
            ..ListQuery::default()
        };
        let state = State {
            query,
            search_input: String::new(),
            result: ListResult::default(),
            issued: 0,
            in_flight: 0,
            search_generation: 0,
            pending_search: None,
        };
        Self {
            inner: Arc::new(Inner {
                source,
                context,
                config,
                state: Mutex::new(state),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<S::Row>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn context(&self) -> &AppContext {
        &self.inner.context
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Record a search edit and schedule a fetch after the quiet period.
    ///
    /// A pending fetch from an earlier edit is cancelled. When the timer
    /// fires with a term different from the applied one, the term is
    /// applied, the page resets to 0 and a fetch runs.
    pub fn set_search_term(&self, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.lock();
        state.search_input.clone_from(&text);
        state.search_generation += 1;
        let generation = state.search_generation;
        if let Some(pending) = state.pending_search.take() {
            pending.abort();
        }

        let this = self.clone();
        let delay = self.inner.config.search_debounce;
        state.pending_search = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.apply_search(generation, text).await;
        }));
    }

    /// Apply a search term immediately, skipping the quiet period.
    pub async fn search_now(&self, text: impl Into<String>) -> FetchOutcome {
        let text = text.into();
        {
            let mut state = self.lock();
            state.search_generation += 1;
            if let Some(pending) = state.pending_search.take() {
                pending.abort();
            }
            state.search_input.clone_from(&text);
            state.query.search_term = text;
            state.query.page_index = 0;
        }
        self.fetch().await
    }

    async fn apply_search(&self, generation: u64, text: String) {
        {
            let mut state = self.lock();
            // A newer edit already replaced this timer.
            if state.search_generation != generation {
                return;
            }
            state.pending_search = None;
            if state.query.search_term == text {
                return;
            }
            state.query.search_term = text;
            state.query.page_index = 0;
        }
        tracing::debug!("search term settled");
        self.fetch().await;
    }

    /// Whether a debounced search is waiting for its timer.
    pub fn has_pending_search(&self) -> bool {
        self.lock().pending_search.is_some()
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Go to `index`, clamped to the last known page.
    pub async fn set_page(&self, index: usize) -> FetchOutcome {
        {
            let mut state = self.lock();
            let last = state.result.total_pages - 1;
            state.query.page_index = index.min(last);
        }
        self.fetch().await
    }

    /// Change the page size and go back to the first page.
    pub async fn set_page_size(&self, page_size: usize) -> Result<FetchOutcome> {
        if page_size == 0 {
            return Err(AdminError::InvalidPageSize);
        }
        {
            let mut state = self.lock();
            state.query.page_size = page_size;
            state.query.page_index = 0;
        }
        Ok(self.fetch().await)
    }

    pub async fn first_page(&self) -> FetchOutcome {
        self.set_page(0).await
    }

    pub async fn previous_page(&self) -> FetchOutcome {
        let index = self.lock().query.page_index.saturating_sub(1);
        self.set_page(index).await
    }

    pub async fn next_page(&self) -> FetchOutcome {
        let index = self.lock().query.page_index + 1;
        self.set_page(index).await
    }

    pub async fn last_page(&self) -> FetchOutcome {
        let index = self.lock().result.total_pages - 1;
        self.set_page(index).await
    }

    pub fn can_previous_page(&self) -> bool {
        self.lock().query.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        let state = self.lock();
        state.query.page_index + 1 < state.result.total_pages
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the current query.
    ///
    /// When the page turns out to be past the end (rows were deleted), the
    /// query steps back to the last page and fetches again.
    pub async fn fetch(&self) -> FetchOutcome {
        loop {
            let (seq, query) = self.issue();
            let response = self.request(&query).await;
            match self.settle(seq, response) {
                Settle::Done(outcome) => return outcome,
                Settle::StepBack => continue,
            }
        }
    }

    /// Fetch again with the current query, e.g. after an edit elsewhere.
    pub async fn refresh(&self) -> FetchOutcome {
        self.fetch().await
    }

    fn issue(&self) -> (u64, ListQuery) {
        let mut state = self.lock();
        state.issued += 1;
        state.in_flight += 1;
        (state.issued, state.query.clone())
    }

    async fn request(
        &self,
        query: &ListQuery,
    ) -> std::result::Result<LeadPage<S::Row>, ApiError> {
        let credential = self.inner.context.auth.require()?;
        let _busy = self.inner.context.busy.guard();
        tracing::debug!(
            page = query.page_index + 1,
            limit = query.page_size,
            "fetching list page"
        );
        self.inner.source.fetch(&query.params(), &credential).await
    }

    fn settle(
        &self,
        seq: u64,
        response: std::result::Result<LeadPage<S::Row>, ApiError>,
    ) -> Settle {
        let mut state = self.lock();
        state.in_flight -= 1;
        if seq != state.issued {
            tracing::debug!(seq, latest = state.issued, "discarding superseded list response");
            return Settle::Done(FetchOutcome::Superseded);
        }

        match response {
            Ok(page) => {
                state.result = ListResult::from(page);
                let last = state.result.total_pages - 1;
                if state.query.page_index > last {
                    tracing::debug!(
                        from = state.query.page_index,
                        to = last,
                        "page out of range; stepping back"
                    );
                    state.query.page_index = last;
                    return Settle::StepBack;
                }
                Settle::Done(FetchOutcome::Applied)
            }
            Err(err) => {
                // Keep the page count so the pager stays where it was.
                state.result.rows.clear();
                drop(state);
                self.inner.context.report_failure(&err, err.user_message());
                Settle::Done(FetchOutcome::Failed(err))
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Delete a row, then resynchronize with the server.
    pub async fn remove(&self, id: S::Id) -> Result<FetchOutcome> {
        let label = self
            .lock()
            .result
            .rows
            .iter()
            .find(|row| S::row_id(row) == id)
            .map(S::row_label)
            .unwrap_or_else(|| id.to_string());

        let deleted: std::result::Result<(), ApiError> = async {
            let credential = self.inner.context.auth.require()?;
            let _busy = self.inner.context.busy.guard();
            self.inner.source.delete(id, &credential).await
        }
        .await;

        let messages = &self.inner.config.messages;
        match deleted {
            Ok(()) => {
                tracing::info!(%id, "row deleted");
                self.inner.context.events.success(messages.deleted(&label));
                Ok(self.fetch().await)
            }
            Err(err) => {
                self.inner
                    .context
                    .report_failure(&err, &messages.delete_failed);
                Err(err.into())
            }
        }
    }

    /// Export every row and hand the bytes to `sink`.
    pub async fn export_all(&self, sink: &dyn ExportSink) -> Result<PathBuf> {
        let messages = &self.inner.config.messages;

        let exported: std::result::Result<Vec<u8>, ApiError> = async {
            let credential = self.inner.context.auth.require()?;
            let _busy = self.inner.context.busy.guard();
            self.inner.source.export(&credential).await
        }
        .await;

        let bytes = match exported {
            Ok(bytes) => bytes,
            Err(err) => {
                self.inner
                    .context
                    .report_failure(&err, &messages.export_failed);
                return Err(err.into());
            }
        };

        let file_name = export_file_name(chrono::Utc::now().date_naive());
        match sink.save(&file_name, &bytes) {
            Ok(path) => {
                self.inner.context.events.success(&messages.export_started);
                Ok(path)
            }
            Err(source) => {
                tracing::warn!(error = %source, file_name = %file_name, "failed to store export");
                self.inner.context.events.error(&messages.export_failed);
                Err(AdminError::Export {
                    path: PathBuf::from(file_name),
                    source,
                })
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn query(&self) -> ListQuery {
        self.lock().query.clone()
    }

    /// Search box text, which may be ahead of the applied term.
    pub fn search_input(&self) -> String {
        self.lock().search_input.clone()
    }

    pub fn result(&self) -> ListResult<S::Row> {
        self.lock().result.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    /// `Página <n> de <total>`
    pub fn page_label(&self) -> String {
        let state = self.lock();
        format!(
            "Página {} de {}",
            state.query.page_index + 1,
            state.result.total_pages
        )
    }

    pub fn config(&self) -> &ListConfig {
        &self.inner.config
    }
}

impl<S: ListSource> fmt::Debug for ListCoordinator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ListCoordinator")
            .field("query", &state.query)
            .field("rows", &state.result.rows.len())
            .field("total_pages", &state.result.total_pages)
            .field("in_flight", &state.in_flight)
            .finish()
    }
}
