//! Per-resource services
//!
//! Each backend resource exposes the same CRUD surface (`get_all`,
//! `get_paged`, `get_by_id`, `create`, `update`, `delete`).
//! [`ResourceService`] implements it once, typed by the entity and request
//! DTOs; the `ApiClient::customers()`-style accessors hand out typed
//! instances, and [`ResourceKind`] names them for the CLI.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::marker::PhantomData;

use super::client::ApiClient;
use super::error::ApiResult;
use super::paging::{PageQuery, PagedResult};
use crate::models::*;

/// Every resource collection the backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ResourceKind {
    Customers,
    Locations,
    Products,
    Warehouses,
    Vans,
    Scanners,
    Variations,
    Users,
    Routes,
    Transfers,
    WarehouseInventory,
    VanInventory,
    TransferInventory,
    RestockRequests,
    FollowupRequests,
    SuppliesRequests,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 16] = [
        ResourceKind::Customers,
        ResourceKind::Locations,
        ResourceKind::Products,
        ResourceKind::Warehouses,
        ResourceKind::Vans,
        ResourceKind::Scanners,
        ResourceKind::Variations,
        ResourceKind::Users,
        ResourceKind::Routes,
        ResourceKind::Transfers,
        ResourceKind::WarehouseInventory,
        ResourceKind::VanInventory,
        ResourceKind::TransferInventory,
        ResourceKind::RestockRequests,
        ResourceKind::FollowupRequests,
        ResourceKind::SuppliesRequests,
    ];

    /// Path segment under the API base URL
    pub fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::Customers => "Customers",
            ResourceKind::Locations => "Locations",
            ResourceKind::Products => "Products",
            ResourceKind::Warehouses => "Warehouses",
            ResourceKind::Vans => "Vans",
            ResourceKind::Scanners => "Scanners",
            ResourceKind::Variations => "Variations",
            ResourceKind::Users => "Users",
            ResourceKind::Routes => "Routes",
            ResourceKind::Transfers => "Transfers",
            ResourceKind::WarehouseInventory => "WarehouseInventory",
            ResourceKind::VanInventory => "VanInventory",
            ResourceKind::TransferInventory => "TransferInventory",
            ResourceKind::RestockRequests => "RestockRequest",
            ResourceKind::FollowupRequests => "FollowupRequests",
            ResourceKind::SuppliesRequests => "RequestSupplies",
        }
    }

    /// Singular noun used in toasts ("Customer deleted")
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Customers => "customer",
            ResourceKind::Locations => "location",
            ResourceKind::Products => "product",
            ResourceKind::Warehouses => "warehouse",
            ResourceKind::Vans => "van",
            ResourceKind::Scanners => "scanner",
            ResourceKind::Variations => "variation",
            ResourceKind::Users => "user",
            ResourceKind::Routes => "route",
            ResourceKind::Transfers => "transfer",
            ResourceKind::WarehouseInventory => "warehouse inventory item",
            ResourceKind::VanInventory => "van inventory item",
            ResourceKind::TransferInventory => "transfer inventory item",
            ResourceKind::RestockRequests => "restock request",
            ResourceKind::FollowupRequests => "follow-up request",
            ResourceKind::SuppliesRequests => "supplies request",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// A source of paged rows, implemented by every resource service
#[async_trait]
pub trait PagedSource<T>: Send + Sync {
    async fn fetch_page(&self, query: &PageQuery) -> ApiResult<PagedResult<T>>;
}

/// Something rows can be deleted from by id
#[async_trait]
pub trait Removable: Send + Sync {
    async fn remove(&self, id: i64) -> ApiResult<()>;
}

/// CRUD surface for one resource
pub struct ResourceService<E, R> {
    client: ApiClient,
    kind: ResourceKind,
    _types: PhantomData<fn() -> (E, R)>,
}

impl<E, R> Clone for ResourceService<E, R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            kind: self.kind,
            _types: PhantomData,
        }
    }
}

impl<E, R> ResourceService<E, R>
where
    E: DeserializeOwned,
    R: Serialize + Sync,
{
    pub fn new(client: ApiClient, kind: ResourceKind) -> Self {
        Self {
            client,
            kind,
            _types: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// `GET /{R}`
    pub async fn get_all(&self) -> ApiResult<Vec<E>> {
        self.client.get(self.kind.endpoint()).await
    }

    /// `GET /{R}/paged?pageNumber&pageSize&sortBy&sortOrder&search`
    pub async fn get_paged(&self, query: &PageQuery) -> ApiResult<PagedResult<E>> {
        let path = format!("{}/paged", self.kind.endpoint());
        self.client.get_with_query(&path, query).await
    }

    /// `GET /{R}/{id}`
    pub async fn get_by_id(&self, id: i64) -> ApiResult<E> {
        self.client.get(&self.item_path(id)).await
    }

    /// `POST /{R}`, returning the created entity
    pub async fn create(&self, request: &R) -> ApiResult<E> {
        let created = self.client.post(self.kind.endpoint(), request).await?;
        tracing::info!(resource = %self.kind, "Created {}", self.kind.label());
        Ok(created)
    }

    /// `PUT /{R}/{id}`
    pub async fn update(&self, id: i64, request: &R) -> ApiResult<()> {
        self.client.put(&self.item_path(id), request).await?;
        tracing::info!(resource = %self.kind, id, "Updated {}", self.kind.label());
        Ok(())
    }

    /// `DELETE /{R}/{id}`
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&self.item_path(id)).await?;
        tracing::info!(resource = %self.kind, id, "Deleted {}", self.kind.label());
        Ok(())
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.kind.endpoint(), id)
    }
}

#[async_trait]
impl<E, R> PagedSource<E> for ResourceService<E, R>
where
    E: DeserializeOwned + Send,
    R: Serialize + Sync,
{
    async fn fetch_page(&self, query: &PageQuery) -> ApiResult<PagedResult<E>> {
        self.get_paged(query).await
    }
}

#[async_trait]
impl<E, R> Removable for ResourceService<E, R>
where
    E: DeserializeOwned,
    R: Serialize + Sync,
{
    async fn remove(&self, id: i64) -> ApiResult<()> {
        self.delete(id).await
    }
}

/// Untyped service for the CLI, which only prints rows
pub type JsonService = ResourceService<serde_json::Value, serde_json::Value>;

impl ApiClient {
    pub fn resource<E, R>(&self, kind: ResourceKind) -> ResourceService<E, R>
    where
        E: DeserializeOwned,
        R: Serialize + Sync,
    {
        ResourceService::new(self.clone(), kind)
    }

    pub fn json_resource(&self, kind: ResourceKind) -> JsonService {
        ResourceService::new(self.clone(), kind)
    }

    pub fn customers(&self) -> ResourceService<Customer, CustomerRequest> {
        self.resource(ResourceKind::Customers)
    }

    pub fn locations(&self) -> ResourceService<Location, LocationRequest> {
        self.resource(ResourceKind::Locations)
    }

    pub fn products(&self) -> ResourceService<Product, ProductRequest> {
        self.resource(ResourceKind::Products)
    }

    pub fn warehouses(&self) -> ResourceService<Warehouse, WarehouseRequest> {
        self.resource(ResourceKind::Warehouses)
    }

    pub fn vans(&self) -> ResourceService<Van, VanRequest> {
        self.resource(ResourceKind::Vans)
    }

    pub fn scanners(&self) -> ResourceService<Scanner, ScannerRequest> {
        self.resource(ResourceKind::Scanners)
    }

    pub fn variations(&self) -> ResourceService<Variation, VariationRequest> {
        self.resource(ResourceKind::Variations)
    }

    pub fn users(&self) -> ResourceService<User, UserRequest> {
        self.resource(ResourceKind::Users)
    }

    pub fn routes(&self) -> ResourceService<Route, RouteRequest> {
        self.resource(ResourceKind::Routes)
    }

    pub fn transfers(&self) -> ResourceService<Transfer, TransferRequest> {
        self.resource(ResourceKind::Transfers)
    }

    pub fn warehouse_inventory(&self) -> ResourceService<WarehouseInventory, InventoryRequest> {
        self.resource(ResourceKind::WarehouseInventory)
    }

    pub fn van_inventory(&self) -> ResourceService<VanInventory, InventoryRequest> {
        self.resource(ResourceKind::VanInventory)
    }

    pub fn transfer_inventory(&self) -> ResourceService<TransferInventory, InventoryRequest> {
        self.resource(ResourceKind::TransferInventory)
    }

    pub fn restock_requests(&self) -> ResourceService<RestockRequest, RestockRequest> {
        self.resource(ResourceKind::RestockRequests)
    }

    pub fn followup_requests(&self) -> ResourceService<FollowupRequest, FollowupRequest> {
        self.resource(ResourceKind::FollowupRequests)
    }

    pub fn supplies_requests(&self) -> ResourceService<SuppliesRequest, SuppliesRequest> {
        self.resource(ResourceKind::SuppliesRequests)
    }

    // ============================================
    // Scoped lookups
    // ============================================

    /// `GET /WarehouseInventory/warehouse/{id}`
    pub async fn inventory_for_warehouse(&self, warehouse_id: i64) -> ApiResult<Vec<WarehouseInventory>> {
        self.get(&format!("WarehouseInventory/warehouse/{}", warehouse_id))
            .await
    }

    /// `GET /VanInventory/van/{id}`
    pub async fn inventory_for_van(&self, van_id: i64) -> ApiResult<Vec<VanInventory>> {
        self.get(&format!("VanInventory/van/{}", van_id)).await
    }

    /// `GET /TransferInventory/transfer/{id}`
    pub async fn inventory_for_transfer(&self, transfer_id: i64) -> ApiResult<Vec<TransferInventory>> {
        self.get(&format!("TransferInventory/transfer/{}", transfer_id))
            .await
    }

    /// `GET /Products/barcode/{code}`, the lookup behind a scan
    pub async fn product_by_barcode(&self, barcode: &str) -> ApiResult<Product> {
        let code = urlencoding::encode(barcode.trim());
        self.get(&format!("Products/barcode/{}", code)).await
    }

    /// `PUT /Transfers/{id}/status`
    pub async fn update_transfer_status(&self, transfer_id: i64, status: TransferStatus) -> ApiResult<()> {
        self.put(
            &format!("Transfers/{}/status", transfer_id),
            &TransferStatusUpdate { status },
        )
        .await?;
        tracing::info!(transfer_id, status = %status, "Transfer status changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_match_backend_names() {
        assert_eq!(ResourceKind::RestockRequests.endpoint(), "RestockRequest");
        assert_eq!(ResourceKind::SuppliesRequests.endpoint(), "RequestSupplies");
        assert_eq!(ResourceKind::WarehouseInventory.to_string(), "WarehouseInventory");
    }

    #[test]
    fn test_all_kinds_have_distinct_endpoints() {
        let mut endpoints: Vec<_> = ResourceKind::ALL.iter().map(|k| k.endpoint()).collect();
        endpoints.sort();
        endpoints.dedup();
        assert_eq!(endpoints.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_item_path() {
        let client = ApiClient::new(Default::default()).unwrap();
        let vans = client.vans();
        assert_eq!(vans.item_path(12), "Vans/12");
        assert_eq!(vans.kind(), ResourceKind::Vans);
    }
}
