// src/controllers/list.rs

//! List data controller.
//!
//! Owns a [`QueryState`] and the [`ViewState`] derived from it. Every query
//! change bumps a version counter; a fetch carries the version it was
//! started under in its [`FetchTicket`], and a completed fetch is applied
//! only if that version is still current. Responses that arrive after a
//! newer query was started are dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use tokio::sync::watch;

use super::confirm::{DialogState, Prompt};
use crate::error::Result;
use crate::models::{Department, Entity, ExportFormat, Page, Student};
use crate::query::{QueryChange, QueryState};
use crate::services::RemoteGateway;
use crate::storage::export::write_export;

pub const TOGGLE_FAILED: &str = "Failed to update status.";
pub const DOWNLOAD_FAILED: &str = "Failed to download student list. Please try again.";

/// Rendered snapshot of a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<E> {
    pub items: Vec<E>,
    pub loading: bool,
    pub error: Option<String>,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<E> Default for ViewState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            total_elements: 0,
            total_pages: 0,
        }
    }
}

/// Identifies one fetch and the query it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub version: u64,
    pub query: QueryState,
}

/// A record type that can back a list view.
pub trait ListResource: Entity + Send + Sync + 'static {
    /// Shown when a page fetch fails.
    const FETCH_FAILED: &'static str;

    fn fetch_page(
        gateway: Arc<dyn RemoteGateway>,
        query: QueryState,
    ) -> BoxFuture<'static, Result<Page<Self>>>;

    fn toggle_status(gateway: Arc<dyn RemoteGateway>, item: Self) -> BoxFuture<'static, Result<Self>>;

    fn toggle_prompt(&self) -> Prompt;
}

impl ListResource for Student {
    const FETCH_FAILED: &'static str = "Failed to fetch students. Please try again later.";

    fn fetch_page(
        gateway: Arc<dyn RemoteGateway>,
        query: QueryState,
    ) -> BoxFuture<'static, Result<Page<Self>>> {
        Box::pin(async move { gateway.list_students(&query).await })
    }

    fn toggle_status(gateway: Arc<dyn RemoteGateway>, item: Self) -> BoxFuture<'static, Result<Self>> {
        Box::pin(async move { gateway.toggle_student_status(&item.student_id).await })
    }

    fn toggle_prompt(&self) -> Prompt {
        Prompt::toggle_student(self)
    }
}

impl ListResource for Department {
    const FETCH_FAILED: &'static str = "Failed to fetch departments. Please try again later.";

    fn fetch_page(
        gateway: Arc<dyn RemoteGateway>,
        query: QueryState,
    ) -> BoxFuture<'static, Result<Page<Self>>> {
        Box::pin(async move { gateway.list_departments(&query).await })
    }

    fn toggle_status(gateway: Arc<dyn RemoteGateway>, item: Self) -> BoxFuture<'static, Result<Self>> {
        Box::pin(async move { gateway.toggle_department_status(item.id).await })
    }

    fn toggle_prompt(&self) -> Prompt {
        Prompt::toggle_department(self)
    }
}

/// Query state, view state and the pending confirmation for one list view.
pub struct ListController<E: ListResource> {
    gateway: Arc<dyn RemoteGateway>,
    query: QueryState,
    version: u64,
    view: watch::Sender<ViewState<E>>,
    dialog: DialogState<E>,
}

impl<E: ListResource> ListController<E> {
    pub fn new(gateway: Arc<dyn RemoteGateway>, query: QueryState) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        Self {
            gateway,
            query,
            version: 0,
            view,
            dialog: DialogState::Closed,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Version of the most recently initiated fetch.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// New reader of the view state.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<E>> {
        self.view.subscribe()
    }

    /// Copy of the current view state.
    pub fn view(&self) -> ViewState<E> {
        self.view.borrow().clone()
    }

    pub fn dialog(&self) -> &DialogState<E> {
        &self.dialog
    }

    /// Apply a query change. Starts a fetch only if something changed.
    pub fn change(&mut self, change: QueryChange) -> Option<FetchTicket> {
        change
            .apply(&mut self.query)
            .then(|| self.begin_fetch())
    }

    /// Start a fetch for the current query.
    ///
    /// Marks the view loading without clearing the displayed items.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.version += 1;
        self.view.send_modify(|view| {
            view.loading = true;
            view.error = None;
        });
        FetchTicket {
            version: self.version,
            query: self.query.clone(),
        }
    }

    /// The request for `ticket`. Holds no borrow of the controller.
    pub fn fetch(&self, ticket: &FetchTicket) -> BoxFuture<'static, Result<Page<E>>> {
        E::fetch_page(Arc::clone(&self.gateway), ticket.query.clone())
    }

    /// Apply a finished fetch if it is still the latest one.
    ///
    /// Returns whether the result was applied.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<Page<E>>) -> bool {
        if ticket.version != self.version {
            log::debug!(
                "Dropping stale response for version {} (current {})",
                ticket.version,
                self.version
            );
            return false;
        }

        match result {
            Ok(page) => {
                self.view.send_replace(ViewState {
                    items: page.content,
                    loading: false,
                    error: None,
                    total_elements: page.total_elements,
                    total_pages: page.total_pages,
                });
            }
            Err(e) => {
                log::error!("List fetch failed for {:?}: {}", ticket.query, e);
                self.view.send_modify(|view| {
                    view.loading = false;
                    view.error = Some(E::FETCH_FAILED.to_string());
                });
            }
        }
        true
    }

    /// Fetch the current query and apply the result.
    pub async fn refresh(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let result = self.fetch(&ticket).await;
        self.complete(ticket, result)
    }

    /// Apply a change and, if it started a fetch, wait for it.
    pub async fn update(&mut self, change: QueryChange) -> bool {
        match self.change(change) {
            Some(ticket) => {
                let result = self.fetch(&ticket).await;
                self.complete(ticket, result)
            }
            None => false,
        }
    }

    /// Open the confirmation prompt for toggling the row with `id`.
    pub fn request_toggle(&mut self, id: i64) -> Option<Prompt> {
        let item = self.view.borrow().items.iter().find(|e| e.id() == id).cloned()?;
        let prompt = item.toggle_prompt();
        self.dialog.open(prompt.clone(), item);
        Some(prompt)
    }

    pub fn cancel_toggle(&mut self) {
        self.dialog.cancel();
    }

    /// Close the prompt and return the toggle request, if one was open.
    pub fn begin_toggle(&mut self) -> Option<BoxFuture<'static, Result<E>>> {
        let item = self.dialog.confirm()?;
        Some(E::toggle_status(Arc::clone(&self.gateway), item))
    }

    /// Apply a finished toggle: swap in the updated row, or flag the error.
    pub fn complete_toggle(&mut self, result: Result<E>) -> Option<E> {
        match result {
            Ok(updated) => {
                self.replace_item(updated.clone());
                Some(updated)
            }
            Err(e) => {
                log::error!("Status toggle failed: {}", e);
                self.view.send_modify(|view| {
                    view.error = Some(TOGGLE_FAILED.to_string());
                });
                None
            }
        }
    }

    /// Confirm the open prompt and wait for the toggle.
    pub async fn confirm_toggle(&mut self) -> Option<E> {
        let request = self.begin_toggle()?;
        let result = request.await;
        self.complete_toggle(result)
    }

    /// Replace the row with the same id. Other rows are untouched.
    pub fn replace_item(&mut self, updated: E) {
        self.view.send_if_modified(|view| {
            match view.items.iter_mut().find(|e| e.id() == updated.id()) {
                Some(slot) => {
                    *slot = updated;
                    true
                }
                None => false,
            }
        });
    }
}

impl ListController<Student> {
    /// Download the current filter/status as a file in `dir`.
    pub async fn export(
        &mut self,
        format: ExportFormat,
        dir: &Path,
        today: NaiveDate,
    ) -> Result<PathBuf> {
        self.view.send_modify(|view| view.loading = true);

        let result = async {
            let bytes = self.gateway.download_students(format, &self.query).await?;
            write_export(dir, &format.file_name("students", today), &bytes).await
        }
        .await;

        match result {
            Ok(path) => {
                self.view.send_modify(|view| view.loading = false);
                Ok(path)
            }
            Err(e) => {
                log::error!("Download failed: {}", e);
                self.view.send_modify(|view| {
                    view.loading = false;
                    view.error = Some(DOWNLOAD_FAILED.to_string());
                });
                Err(e)
            }
        }
    }
}
