//! Products, their variants and variant attributes

use serde::{Deserialize, Serialize};

/// Maximum barcodes stored per variant
pub const MAX_BARCODES: usize = 4;

/// A product as returned by `/Products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    /// True when the product has a single implicit variant (no axes)
    #[serde(default)]
    pub is_universal: bool,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// One sellable variant of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub barcodes: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<VariantAttribute>,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
}

/// An axis/value pair on a variant, e.g. `Size = M`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantAttribute {
    pub name: String,
    pub value: String,
}

/// Body for `POST /Products` and `PUT /Products/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub is_universal: bool,
    pub variants: Vec<ProductVariant>,
}

fn default_true() -> bool {
    true
}
