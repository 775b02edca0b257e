//! Paged list queries and the envelope the backend returns for them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default rows per page for every table
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Sort direction sent as `sortOrder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Query string for `GET /{Resource}/paged`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// 1-based page number
    pub page_number: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: None,
            search: None,
        }
    }
}

impl PageQuery {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
            ..Default::default()
        }
    }

    pub fn sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    /// Set the search term; blank input clears it
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        let term = term.as_ref().trim();
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        self
    }
}

/// The `{data, totalCount, pageNumber, pageSize, totalPages}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    /// An empty page answering `query`
    pub fn empty(query: &PageQuery) -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
            page_number: query.page_number,
            page_size: query.page_size,
            total_pages: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// 1-based index of the first row on this page, 0 when empty
    pub fn first_row(&self) -> u64 {
        if self.data.is_empty() {
            0
        } else {
            (self.page_number.saturating_sub(1) as u64) * self.page_size as u64 + 1
        }
    }

    /// 1-based index of the last row on this page, 0 when empty
    pub fn last_row(&self) -> u64 {
        if self.data.is_empty() {
            0
        } else {
            self.first_row() + self.data.len() as u64 - 1
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            data: self.data.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_serializes_camel_case() {
        let q = PageQuery::new(2, 50).sort("companyName", SortOrder::Desc).search(" acme ");
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["pageNumber"], 2);
        assert_eq!(value["pageSize"], 50);
        assert_eq!(value["sortBy"], "companyName");
        assert_eq!(value["sortOrder"], "desc");
        assert_eq!(value["search"], "acme");
    }

    #[test]
    fn test_blank_search_is_omitted() {
        let q = PageQuery::default().search("   ");
        let value = serde_json::to_value(&q).unwrap();
        assert!(value.get("search").is_none());
        assert!(value.get("sortBy").is_none());
    }

    #[test]
    fn test_paged_result_row_range() {
        let page: PagedResult<u32> = serde_json::from_str(
            r#"{"data":[1,2,3],"totalCount":53,"pageNumber":3,"pageSize":25,"totalPages":3}"#,
        )
        .unwrap();
        assert_eq!(page.first_row(), 51);
        assert_eq!(page.last_row(), 53);
        assert!(!page.has_next());
        assert!(page.has_previous());

        let empty: PagedResult<u32> = PagedResult::empty(&PageQuery::default());
        assert_eq!(empty.first_row(), 0);
        assert_eq!(empty.last_row(), 0);
    }
}
