//! Stock transfers between warehouses and vans

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    Pending,
    InTransit,
    Completed,
    Cancelled,
}

impl TransferStatus {
    /// Parse a status the way users type it (`in-transit`, `InTransit`, `in transit`)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Some(TransferStatus::Pending),
            "intransit" => Some(TransferStatus::InTransit),
            "completed" => Some(TransferStatus::Completed),
            "cancelled" | "canceled" => Some(TransferStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether no further status change is accepted
    pub fn is_final(self) -> bool {
        matches!(self, TransferStatus::Completed | TransferStatus::Cancelled)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransferStatus::Pending => "Pending",
            TransferStatus::InTransit => "InTransit",
            TransferStatus::Completed => "Completed",
            TransferStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

/// A transfer as returned by `/Transfers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: i64,
    #[serde(default)]
    pub from_warehouse_id: Option<i64>,
    #[serde(default)]
    pub to_van_id: Option<i64>,
    #[serde(default)]
    pub to_warehouse_id: Option<i64>,
    pub status: TransferStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<TransferItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferItem {
    pub product_variant_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_warehouse_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_van_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_warehouse_id: Option<i64>,
    pub items: Vec<TransferItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body for `PUT /Transfers/{id}/status`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStatusUpdate {
    pub status: TransferStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(TransferStatus::parse("in-transit"), Some(TransferStatus::InTransit));
        assert_eq!(TransferStatus::parse("InTransit"), Some(TransferStatus::InTransit));
        assert_eq!(TransferStatus::parse("canceled"), Some(TransferStatus::Cancelled));
        assert_eq!(TransferStatus::parse("shipped"), None);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TransferStatus::InTransit).unwrap();
        assert_eq!(json, "\"InTransit\"");
        assert!(TransferStatus::Completed.is_final());
        assert!(!TransferStatus::Pending.is_final());
    }
}
