//! Paginated tables
//!
//! Server-side paging and search, client-side filter and sort over the
//! loaded page, page-size options derived from the total row count, and the
//! delete flow shared by every list screen.

mod controller;
mod debounce;
mod page_size;
mod state;

use serde::Deserialize;
use std::time::Duration;

pub use controller::{DeleteOutcome, TableController};
pub use debounce::{SearchDebouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use page_size::{
    compute_page_size_options, page_size_options_or_default, total_pages, PAGE_SIZE_STEPS,
};
pub use state::TableState;

use crate::api::DEFAULT_PAGE_SIZE;

/// Table settings (`[table]` in the config file)
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_search_debounce() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            search_debounce_ms: default_search_debounce(),
        }
    }
}

impl TableConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
