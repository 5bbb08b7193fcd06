use std::io;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::backend::AdminBackend;
use super::export::{export_csv, ExportError};
use super::query::{ListFilter, ListQuery, Pagination};
use super::resource::AdminResource;
use crate::backend::BackendError;
use crate::workflows::Notice;

/// What a load or mutation ended in, from the screen's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Loaded { rows: usize },
    Saved,
    /// The session is gone; navigate to the sign-in route instead of toasting.
    RedirectToSignIn(String),
    Failed(BackendError),
}

/// One admin screen's local state: the loaded page, filters, and in-flight flags.
///
/// Mutations never touch `rows` directly; they succeed or fail on the server and
/// are followed by a full refetch.
pub struct RemoteCollection<R, B: ?Sized> {
    backend: Arc<B>,
    sign_in_route: String,
    query: ListQuery,
    filter: ListFilter,
    rows: Vec<R>,
    pagination: Pagination,
    loading: bool,
    saving: bool,
    redirect: Option<String>,
    notices: Vec<Notice>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, B> RemoteCollection<R, B>
where
    R: AdminResource,
    B: AdminBackend + ?Sized,
{
    pub fn new(backend: Arc<B>, sign_in_route: impl Into<String>) -> Self {
        Self {
            backend,
            sign_in_route: sign_in_route.into(),
            query: ListQuery::default(),
            filter: ListFilter::default(),
            rows: Vec::new(),
            pagination: Pagination::default(),
            loading: false,
            saving: false,
            redirect: None,
            notices: Vec::new(),
            _resource: PhantomData,
        }
    }

    pub fn with_query(mut self, query: ListQuery) -> Self {
        self.query = query;
        self
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Sign-in route the screen must navigate to, once a 401 has been seen.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    /// Narrow the loaded rows by a category field; `all` or blank clears it.
    pub fn set_facet(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.filter.facets.insert(name.into(), value.into());
    }

    pub fn clear_filters(&mut self) {
        self.filter = ListFilter::default();
    }

    /// Loaded rows passing the search box and facet selectors.
    pub fn visible(&self) -> Vec<&R> {
        self.rows
            .iter()
            .filter(|row| self.filter.matches(*row))
            .collect()
    }

    pub fn export_visible<W: io::Write>(&self, writer: W) -> Result<usize, ExportError> {
        export_csv(&self.visible(), writer)
    }

    pub async fn refresh(&mut self) -> ViewEvent {
        self.loading = true;
        let result = self.backend.list(R::ENDPOINT, &self.query).await;
        self.loading = false;

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(error) => return self.fail("load", error),
        };

        if !envelope.success {
            let message = envelope
                .error
                .clone()
                .unwrap_or_else(|| format!("Failed to load {}", R::NAME));
            return self.fail("load", BackendError::Rejected { status: 200, message });
        }

        let pagination = envelope.pagination_or(&self.query);
        let rows = envelope
            .data
            .into_iter()
            .map(serde_json::from_value::<R>)
            .collect::<Result<Vec<_>, _>>();

        match rows {
            Ok(rows) => {
                info!(
                    resource = R::NAME,
                    rows = rows.len(),
                    page = pagination.page,
                    "collection loaded"
                );
                self.rows = rows;
                self.pagination = pagination;
                ViewEvent::Loaded {
                    rows: self.rows.len(),
                }
            }
            Err(err) => self.fail("load", BackendError::Decode(err.to_string())),
        }
    }

    pub async fn next_page(&mut self) -> Option<ViewEvent> {
        if !self.pagination.has_more {
            return None;
        }
        let target = self.query.page.saturating_add(1);
        Some(self.load_page(target).await)
    }

    pub async fn previous_page(&mut self) -> Option<ViewEvent> {
        if self.query.page <= 1 {
            return None;
        }
        let target = self.query.page - 1;
        Some(self.load_page(target).await)
    }

    /// Fetch another page; the current page number sticks unless it loads.
    async fn load_page(&mut self, page: u32) -> ViewEvent {
        let current = self.query.page;
        self.query.page = page;
        let event = self.refresh().await;
        if !matches!(event, ViewEvent::Loaded { .. }) {
            self.query.page = current;
        }
        event
    }

    pub async fn create(&mut self, body: Value) -> ViewEvent {
        self.saving = true;
        let result = self.backend.create(R::ENDPOINT, body).await;
        self.saving = false;
        self.after_mutation("create", "created", result.map(|_| ())).await
    }

    pub async fn update(&mut self, id: &str, patch: Value) -> ViewEvent {
        self.saving = true;
        let result = self.backend.update(R::ENDPOINT, id, patch).await;
        self.saving = false;
        self.after_mutation("update", "updated", result.map(|_| ())).await
    }

    pub async fn delete(&mut self, id: &str) -> ViewEvent {
        self.saving = true;
        let result = self.backend.delete(R::ENDPOINT, id).await;
        self.saving = false;
        self.after_mutation("delete", "deleted", result).await
    }

    async fn after_mutation(
        &mut self,
        action: &str,
        past_tense: &str,
        result: Result<(), BackendError>,
    ) -> ViewEvent {
        if let Err(error) = result {
            return self.fail(action, error);
        }

        info!(resource = R::NAME, action, "mutation accepted; refetching");
        self.notices
            .push(Notice::success(format!("Record {past_tense} successfully")));
        match self.refresh().await {
            ViewEvent::Loaded { .. } => ViewEvent::Saved,
            other => other,
        }
    }

    pub(crate) fn fail(&mut self, action: &str, error: BackendError) -> ViewEvent {
        if error.is_unauthorized() {
            warn!(resource = R::NAME, action, "session rejected; redirecting to sign-in");
            self.redirect = Some(self.sign_in_route.clone());
            return ViewEvent::RedirectToSignIn(self.sign_in_route.clone());
        }

        warn!(resource = R::NAME, action, error = %error, "admin request failed");
        let detail = error
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        self.notices.push(Notice::error(format!(
            "Failed to {action} {}: {detail}",
            R::NAME
        )));
        ViewEvent::Failed(error)
    }
}
