//! Restock, follow-up and supplies requests raised from the field

use serde::{Deserialize, Serialize};

/// A row from `/RestockRequest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    pub id: i64,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub location_name: Option<String>,
    pub product_variant_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub requested_at: Option<String>,
}

/// A row from `/FollowupRequests`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupRequest {
    pub id: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub location_id: Option<i64>,
    pub reason: String,
    #[serde(default)]
    pub followup_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A row from `/RequestSupplies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppliesRequest {
    pub id: i64,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub location_name: Option<String>,
    pub items: Vec<SupplyItem>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyItem {
    pub name: String,
    pub quantity: i32,
}
