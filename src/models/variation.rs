//! Variation axes (Size, Color, ...) that products can vary along

use serde::{Deserialize, Serialize};

/// A variation axis as returned by `/Variations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub options: Vec<VariationOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationOption {
    #[serde(default)]
    pub id: Option<i64>,
    pub value: String,
}

/// Body for `POST /Variations` and `PUT /Variations/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationRequest {
    pub name: String,
    pub options: Vec<String>,
}

impl Variation {
    /// Option values in backend order
    pub fn option_values(&self) -> Vec<String> {
        self.options.iter().map(|o| o.value.clone()).collect()
    }
}
