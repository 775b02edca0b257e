//! Backend API Layer
//!
//! Typed access to the inventory backend's REST API.
//!
//! ## Endpoints
//!
//! Every resource (`/Customers`, `/Locations`, `/Products`, `/Warehouses`,
//! `/Vans`, `/Scanners`, `/Variations`, `/Users`, `/Routes`, `/Transfers`,
//! `/WarehouseInventory`, `/VanInventory`, `/TransferInventory`,
//! `/RestockRequest`, `/FollowupRequests`, `/RequestSupplies`) supports:
//!
//! - `GET /{R}` - all rows
//! - `GET /{R}/paged` - one page (`pageNumber`, `pageSize`, `sortBy`, `sortOrder`, `search`)
//! - `GET /{R}/{id}` - one row
//! - `POST /{R}` - create
//! - `PUT /{R}/{id}` - update
//! - `DELETE /{R}/{id}` - delete
//!
//! plus `POST /auth/login` and a handful of scoped lookups.

mod client;
mod error;
mod paging;
mod services;

pub use client::{ApiClient, ApiClientConfig};
pub use error::{ApiError, ApiResult};
pub use paging::{PageQuery, PagedResult, SortOrder, DEFAULT_PAGE_SIZE};
pub use services::{JsonService, PagedSource, Removable, ResourceKind, ResourceService};
