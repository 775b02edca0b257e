//! Entity DTOs
//!
//! Request/response shapes mirrored from the backend's JSON contracts
//! (camelCase on the wire). Validation on these types is a user-experience
//! convenience; the backend holds the authoritative rules.

mod customer;
mod fleet;
mod inventory;
mod location;
mod product;
mod requests;
mod route;
mod transfer;
mod user;
mod variation;

pub use customer::{Customer, CustomerRequest};
pub use fleet::{Scanner, ScannerRequest, Van, VanRequest, Warehouse, WarehouseRequest};
pub use inventory::{InventoryRequest, TransferInventory, VanInventory, WarehouseInventory};
pub use location::{Location, LocationRequest};
pub use product::{Product, ProductRequest, ProductVariant, VariantAttribute, MAX_BARCODES};
pub use requests::{FollowupRequest, RestockRequest, SuppliesRequest, SupplyItem};
pub use route::{Route, RouteRequest, RouteStop};
pub use transfer::{Transfer, TransferItem, TransferRequest, TransferStatus, TransferStatusUpdate};
pub use user::{LoginRequest, LoginResponse, User, UserRequest};
pub use variation::{Variation, VariationOption, VariationRequest};
