//! # Depot
//!
//! Client-side toolkit for a warehouse, inventory and delivery-logistics
//! backend: a typed REST client, session handling, keyboard-wedge barcode
//! scanning, product variant generation, and the table and form state the
//! management screens are built from.
//!
//! ## Modules
//!
//! - [`api`]: REST client, paging types and per-resource services
//! - [`session`]: Login, logout and persisted JWT sessions
//! - [`scanner`]: Barcode scan buffering and the scanner service
//! - [`variants`]: Variant combination generation and product validation
//! - [`table`]: Paged tables with debounced search and the delete flow
//! - [`forms`]: Typed entity forms and validators
//! - [`notify`]: Toast notifications and confirmation prompts
//! - [`models`]: Entity DTOs as they appear on the wire
//! - [`output`]: Table, JSON and CSV rendering for the CLI
//! - [`util`]: Phone and date helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use depot::api::{ApiClient, ApiClientConfig, PageQuery};
//! use depot::session::{Session, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ApiClientConfig::default())?;
//!
//!     let mut session = Session::new(SessionStore::memory());
//!     session.login(&client, "admin", "secret").await?;
//!
//!     let page = client
//!         .customers()
//!         .get_paged(&PageQuery::default().search("acme"))
//!         .await?;
//!     println!("{} of {} customers", page.data.len(), page.total_count);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod forms;
pub mod models;
pub mod notify;
pub mod output;
pub mod scanner;
pub mod session;
pub mod table;
pub mod util;
pub mod variants;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiClientConfig, ApiError, ApiResult, PageQuery, PagedResult, ResourceKind};

pub use config::{Config, ConfigError, LoggingConfig};

pub use scanner::{ScanResult, ScannerConfig, ScannerService};

pub use session::{Session, SessionError, SessionStore};

pub use variants::{build_product_request, VariantIssue, VariantMatrix};
