//! Warehouses, vans and handheld scanners

use serde::{Deserialize, Serialize};

/// A warehouse as returned by `/Warehouses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
}

/// A delivery van as returned by `/Vans`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Van {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub warehouse_id: Option<i64>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VanRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

/// A handheld scanner device as returned by `/Scanners`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scanner {
    pub id: i64,
    pub name: String,
    pub serial_number: String,
    #[serde(default)]
    pub assigned_user_id: Option<i64>,
    #[serde(default)]
    pub assigned_user_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_seen: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerRequest {
    pub name: String,
    pub serial_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<i64>,
    pub is_active: bool,
}
