//! Table controller
//!
//! Ties a [`TableState`] to the backend: fetching pages, settled search
//! terms, and the confirm-then-delete-then-refetch flow. Failures leave the
//! table as it was, surface as an error toast, and are still returned so the
//! caller can react to a 401.

use serde::Serialize;
use tokio::sync::mpsc;

use super::state::TableState;
use crate::api::{ApiResult, PagedSource, Removable};
use crate::notify::{delete_prompt, Confirm, ToastQueue};

/// How a delete request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user said no; nothing was sent
    Cancelled,
    Deleted,
}

pub struct TableController<T, S> {
    source: S,
    state: TableState<T>,
    /// Singular noun for messages ("customer")
    label: &'static str,
}

impl<T, S> TableController<T, S>
where
    T: Serialize + Send,
    S: PagedSource<T>,
{
    pub fn new(source: S, page_size: u32, label: &'static str) -> Self {
        Self {
            source,
            state: TableState::new(page_size),
            label,
        }
    }

    pub fn state(&self) -> &TableState<T> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TableState<T> {
        &mut self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the page described by the current query
    pub async fn load(&mut self, toasts: &mut ToastQueue) -> ApiResult<()> {
        self.state.begin_loading();
        let query = self.state.query().clone();

        match self.source.fetch_page(&query).await {
            Ok(page) => {
                tracing::debug!(
                    label = self.label,
                    page = page.page_number,
                    rows = page.data.len(),
                    total = page.total_count,
                    "Loaded page"
                );
                self.state.apply_page(page);
                Ok(())
            }
            Err(e) => {
                let fallback = format!("Failed to load {}s", self.label);
                let message = toasts.report_error(&e, &fallback);
                self.state.apply_error(message);
                Err(e)
            }
        }
    }

    /// Run a server-side search from page 1
    pub async fn search(&mut self, term: &str, toasts: &mut ToastQueue) -> ApiResult<()> {
        self.state.set_search(term);
        self.load(toasts).await
    }

    /// Issue one search per settled term until the debouncer closes.
    ///
    /// A failed search is already toasted and the next term is tried; a 401
    /// stops the loop since every later search would fail the same way.
    pub async fn drive_search(
        &mut self,
        terms: &mut mpsc::UnboundedReceiver<String>,
        toasts: &mut ToastQueue,
    ) -> ApiResult<()> {
        while let Some(term) = terms.recv().await {
            match self.search(&term, toasts).await {
                Err(e) if e.is_unauthorized() => return Err(e),
                _ => {}
            }
        }
        Ok(())
    }
}

impl<T, S> TableController<T, S>
where
    T: Serialize + Send,
    S: PagedSource<T> + Removable,
{
    /// Confirm, delete exactly once, then refetch the current page.
    ///
    /// When the deleted row was the last one on a later page, the previous
    /// page is fetched instead. A refused delete is toasted and returned as
    /// the error; so is a failed refetch after a successful delete.
    pub async fn delete_row(
        &mut self,
        id: i64,
        name: &str,
        confirm: &dyn Confirm,
        toasts: &mut ToastQueue,
    ) -> ApiResult<DeleteOutcome> {
        if !confirm.confirm(&delete_prompt(self.label, name)) {
            tracing::debug!(label = self.label, id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(e) = self.source.remove(id).await {
            let fallback = format!("Failed to delete {}", self.label);
            toasts.report_error(&e, &fallback);
            return Err(e);
        }

        toasts.success(format!("{} deleted successfully", capitalize(self.label)));
        if self.state.rows().len() == 1 && self.state.query().page_number > 1 {
            self.state.previous_page();
        }
        self.load(toasts).await?;
        Ok(DeleteOutcome::Deleted)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiResult, PageQuery, PagedResult};
    use crate::notify::{FixedAnswer, ToastLevel};
    use crate::table::SearchDebouncer;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeSource {
        rows: Mutex<Vec<i64>>,
        fetches: AtomicUsize,
        deletes: AtomicUsize,
        queries: Mutex<Vec<PageQuery>>,
        fail_delete: bool,
        fail_fetch: Option<u16>,
    }

    #[async_trait]
    impl PagedSource<i64> for FakeSource {
        async fn fetch_page(&self, query: &PageQuery) -> ApiResult<PagedResult<i64>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            match self.fail_fetch {
                Some(401) => return Err(ApiError::Unauthorized { message: None }),
                Some(status) => return Err(ApiError::Status { status, message: None }),
                None => {}
            }
            let rows = self.rows.lock().unwrap().clone();
            Ok(PagedResult {
                total_count: rows.len() as u64,
                total_pages: 1,
                page_number: query.page_number,
                page_size: query.page_size,
                data: rows,
            })
        }
    }

    #[async_trait]
    impl Removable for FakeSource {
        async fn remove(&self, id: i64) -> ApiResult<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete {
                return Err(ApiError::Status {
                    status: 409,
                    message: Some("Product has inventory".to_string()),
                });
            }
            self.rows.lock().unwrap().retain(|r| *r != id);
            Ok(())
        }
    }

    fn source(rows: Vec<i64>) -> FakeSource {
        FakeSource {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_cancel_sends_no_delete() {
        let mut table = TableController::new(source(vec![1, 2]), 25, "product");
        let mut toasts = ToastQueue::default();
        table.load(&mut toasts).await.unwrap();

        let outcome = table.delete_row(1, "Tee", &FixedAnswer(false), &mut toasts).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(table.source().deletes.load(Ordering::SeqCst), 0);
        assert_eq!(table.source().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_confirm_deletes_once_then_refetches() {
        let mut table = TableController::new(source(vec![1, 2]), 25, "product");
        let mut toasts = ToastQueue::default();
        table.load(&mut toasts).await.unwrap();

        let outcome = table.delete_row(1, "Tee", &FixedAnswer(true), &mut toasts).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(table.source().deletes.load(Ordering::SeqCst), 1);
        assert_eq!(table.source().fetches.load(Ordering::SeqCst), 2);
        assert_eq!(table.state().rows(), &[2]);
        assert_eq!(toasts.last().unwrap().message, "Product deleted successfully");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_rows_and_toasts() {
        let mut fake = source(vec![1, 2]);
        fake.fail_delete = true;
        let mut table = TableController::new(fake, 25, "product");
        let mut toasts = ToastQueue::default();
        table.load(&mut toasts).await.unwrap();

        let err = table.delete_row(1, "Tee", &FixedAnswer(true), &mut toasts).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(toasts.last().unwrap().message, "Product has inventory");
        assert_eq!(table.state().rows(), &[1, 2]);
        assert_eq!(table.source().fetches.load(Ordering::SeqCst), 1);
        assert_eq!(toasts.last().unwrap().level, ToastLevel::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_typing_fetches_once() {
        let mut table = TableController::new(source(vec![1]), 25, "customer");
        let mut toasts = ToastQueue::default();
        let (debouncer, mut terms, _handle) = SearchDebouncer::spawn(Duration::from_millis(300));

        let typing = tokio::spawn(async move {
            for text in ["a", "ac", "acm", "acme"] {
                debouncer.input(text);
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            tokio::time::sleep(Duration::from_millis(400)).await;
        });

        tokio::select! {
            _ = table.drive_search(&mut terms, &mut toasts) => {}
            _ = typing => {}
        }

        assert_eq!(table.source().fetches.load(Ordering::SeqCst), 1);
        let queries = table.source().queries.lock().unwrap().clone();
        assert_eq!(queries[0].search.as_deref(), Some("acme"));
        assert_eq!(queries[0].page_number, 1);
    }

    #[tokio::test]
    async fn test_failed_load_returns_the_api_error() {
        let mut fake = source(vec![1]);
        fake.fail_fetch = Some(401);
        let mut table = TableController::new(fake, 25, "customer");
        let mut toasts = ToastQueue::default();

        let err = table.load(&mut toasts).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(table.state().error(), Some("Failed to load customers"));
        assert_eq!(toasts.last().unwrap().level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn test_drive_search_stops_on_unauthorized() {
        let mut fake = source(vec![1]);
        fake.fail_fetch = Some(401);
        let mut table = TableController::new(fake, 25, "customer");
        let mut toasts = ToastQueue::default();

        let (tx, mut terms) = mpsc::unbounded_channel();
        tx.send("acme".to_string()).unwrap();
        tx.send("corner".to_string()).unwrap();

        let err = table.drive_search(&mut terms, &mut toasts).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(table.source().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drive_search_continues_after_other_failures() {
        let mut fake = source(vec![1]);
        fake.fail_fetch = Some(500);
        let mut table = TableController::new(fake, 25, "customer");
        let mut toasts = ToastQueue::default();

        let (tx, mut terms) = mpsc::unbounded_channel();
        tx.send("acme".to_string()).unwrap();
        tx.send("corner".to_string()).unwrap();
        drop(tx);

        table.drive_search(&mut terms, &mut toasts).await.unwrap();
        assert_eq!(table.source().fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("van"), "Van");
        assert_eq!(capitalize(""), "");
    }
}
