//! Table view state
//!
//! One page of rows from the backend plus the client-side filter and sort
//! applied over that page. Rows are snapshotted to JSON once per page so any
//! serializable DTO can be filtered and sorted by its wire field names.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use super::page_size::page_size_options_or_default;
use crate::api::{PageQuery, PagedResult, SortOrder};

/// Rows, paging and filter state for one table
#[derive(Debug, Clone)]
pub struct TableState<T> {
    query: PageQuery,
    rows: Vec<T>,
    snapshots: Vec<Value>,
    total_count: u64,
    total_pages: u32,
    filter: String,
    loading: bool,
    error: Option<String>,
}

impl<T: Serialize> TableState<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: PageQuery::new(1, page_size),
            rows: Vec::new(),
            snapshots: Vec::new(),
            total_count: 0,
            total_pages: 0,
            filter: String::new(),
            loading: false,
            error: None,
        }
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Replace the rows with a freshly fetched page
    pub fn apply_page(&mut self, page: PagedResult<T>) {
        self.snapshots = page
            .data
            .iter()
            .map(|row| serde_json::to_value(row).unwrap_or(Value::Null))
            .collect();
        self.rows = page.data;
        self.total_count = page.total_count;
        self.total_pages = page.total_pages;
        self.query.page_number = page.page_number.max(1);
        self.loading = false;
        self.error = None;
    }

    /// Record a failed fetch; the previous rows stay on screen
    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn page_size_options(&self) -> Vec<u32> {
        page_size_options_or_default(self.total_count)
    }

    // ============================================
    // Query changes (each needs a refetch)
    // ============================================

    /// Server-side search; resets to the first page
    pub fn set_search(&mut self, term: &str) {
        self.query = std::mem::take(&mut self.query).search(term);
        self.query.page_number = 1;
    }

    pub fn set_page_size(&mut self, size: u32) {
        self.query.page_size = size.max(1);
        self.query.page_number = 1;
    }

    /// Sort by `column`; sorting by the same column again flips the order
    pub fn sort_by(&mut self, column: &str) {
        let order = match (&self.query.sort_by, self.query.sort_order) {
            (Some(current), Some(order)) if current == column => order.toggled(),
            _ => SortOrder::Asc,
        };
        self.query.sort_by = Some(column.to_string());
        self.query.sort_order = Some(order);
        self.query.page_number = 1;
    }

    /// Sort by `column` in an explicit direction
    pub fn set_sort(&mut self, column: &str, order: SortOrder) {
        self.query.sort_by = Some(column.to_string());
        self.query.sort_order = Some(order);
        self.query.page_number = 1;
    }

    /// Move to `page` (1-based); returns false when it is out of range
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page == 0 || (self.total_pages > 0 && page > self.total_pages) {
            return false;
        }
        self.query.page_number = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.query.page_number + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.query.page_number.saturating_sub(1))
    }

    // ============================================
    // Client-side view
    // ============================================

    /// Client-side filter over the loaded page (case-insensitive substring)
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.trim().to_lowercase();
    }

    /// Loaded rows after the client-side filter and the current sort
    pub fn visible_rows(&self) -> Vec<&T> {
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.filter.is_empty() || row_matches(&self.snapshots[i], &self.filter))
            .collect();

        if let (Some(column), Some(order)) = (&self.query.sort_by, self.query.sort_order) {
            indices.sort_by(|&a, &b| {
                let ord = compare_cells(
                    self.snapshots[a].get(column),
                    self.snapshots[b].get(column),
                );
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        indices.into_iter().map(|i| &self.rows[i]).collect()
    }
}

fn row_matches(row: &Value, needle: &str) -> bool {
    match row {
        Value::Object(map) => map.values().any(|v| row_matches(v, needle)),
        Value::Array(items) => items.iter().any(|v| row_matches(v, needle)),
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Bool(_) | Value::Null => false,
    }
}

/// Numbers numerically, strings case-insensitively, missing/null last
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => cell_text(x).cmp(&cell_text(y)),
    }
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    }
}
