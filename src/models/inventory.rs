//! Stock levels held in warehouses, vans and in-flight transfers

use serde::{Deserialize, Serialize};

/// A row from `/WarehouseInventory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseInventory {
    pub id: i64,
    pub warehouse_id: i64,
    pub product_variant_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub quantity: i32,
    #[serde(default)]
    pub reorder_level: Option<i32>,
}

impl WarehouseInventory {
    /// At or below the configured reorder level
    pub fn needs_restock(&self) -> bool {
        self.reorder_level.is_some_and(|level| self.quantity <= level)
    }
}

/// A row from `/VanInventory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VanInventory {
    pub id: i64,
    pub van_id: i64,
    pub product_variant_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub quantity: i32,
}

/// A row from `/TransferInventory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInventory {
    pub id: i64,
    pub transfer_id: i64,
    pub product_variant_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i32,
    #[serde(default)]
    pub scanned_quantity: i32,
}

/// Body for inventory create/update on any of the three inventory resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub van_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<i64>,
    pub product_variant_id: i64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<i32>,
}
