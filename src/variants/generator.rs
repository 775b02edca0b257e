//! Variant combination generation
//!
//! Turns the selected variation axes of a product into the Cartesian product
//! of their selected options, carrying over whatever the user already typed
//! for combinations that survive a change of selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ProductVariant, VariantAttribute, MAX_BARCODES};

/// Separator between values in a combination's display name
pub const NAME_SEPARATOR: &str = " / ";

/// A variation axis with the options currently selected on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAxis {
    pub name: String,
    pub options: Vec<String>,
}

impl VariationAxis {
    /// Repeated options are dropped, keeping the first occurrence
    pub fn new<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for option in options.into_iter().map(Into::into) {
            if !unique.contains(&option) {
                unique.push(option);
            }
        }
        Self {
            name: name.into(),
            options: unique,
        }
    }
}

/// Per-combination data the user enters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationFields {
    pub sku: String,
    pub description: String,
    pub price: Option<f64>,
    pub barcodes: [String; MAX_BARCODES],
    pub enabled: bool,
}

impl Default for CombinationFields {
    fn default() -> Self {
        Self {
            sku: String::new(),
            description: String::new(),
            price: None,
            barcodes: Default::default(),
            enabled: true,
        }
    }
}

impl CombinationFields {
    /// Non-blank barcodes, trimmed
    pub fn barcodes(&self) -> impl Iterator<Item = &str> {
        self.barcodes.iter().map(|b| b.trim()).filter(|b| !b.is_empty())
    }

    pub fn to_variant(&self, attributes: Vec<VariantAttribute>) -> ProductVariant {
        let sku = self.sku.trim();
        ProductVariant {
            id: None,
            sku: (!sku.is_empty()).then(|| sku.to_string()),
            description: self.description.trim().to_string(),
            price: self.price.unwrap_or_default(),
            barcodes: self.barcodes().map(str::to_string).collect(),
            attributes,
            is_enabled: self.enabled,
        }
    }
}

/// One generated combination, e.g. `Size=M, Color=Red`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub values: Vec<VariantAttribute>,
    pub fields: CombinationFields,
}

impl Combination {
    pub fn new(values: Vec<VariantAttribute>) -> Self {
        Self {
            values,
            fields: CombinationFields::default(),
        }
    }

    /// Values joined by `" / "`, e.g. `"M / Red"`
    pub fn display_name(&self) -> String {
        self.values
            .iter()
            .map(|v| v.value.as_str())
            .collect::<Vec<_>>()
            .join(NAME_SEPARATOR)
    }

    pub fn to_variant(&self) -> ProductVariant {
        self.fields.to_variant(self.values.clone())
    }
}

/// Cartesian product of the axes' options, first axis varying slowest.
///
/// Axes with no options are skipped. No axes (or only empty axes) gives an
/// empty list.
pub fn cartesian_values(axes: &[VariationAxis]) -> Vec<Vec<VariantAttribute>> {
    let active: Vec<&VariationAxis> = axes.iter().filter(|a| !a.options.is_empty()).collect();
    if active.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(active.iter().map(|a| a.options.len()).product());
    let mut current = Vec::with_capacity(active.len());
    expand(&active, &mut current, &mut out);
    out
}

fn expand(
    axes: &[&VariationAxis],
    current: &mut Vec<VariantAttribute>,
    out: &mut Vec<Vec<VariantAttribute>>,
) {
    let Some((axis, rest)) = axes.split_first() else {
        out.push(current.clone());
        return;
    };

    for option in &axis.options {
        current.push(VariantAttribute {
            name: axis.name.clone(),
            value: option.clone(),
        });
        expand(rest, current, out);
        current.pop();
    }
}

/// Regenerate combinations for `axes`, keeping the fields of any previous
/// combination whose values are identical to a new one.
pub fn regenerate(axes: &[VariationAxis], previous: &[Combination]) -> Vec<Combination> {
    let mut kept: HashMap<&[VariantAttribute], &CombinationFields> = previous
        .iter()
        .map(|c| (c.values.as_slice(), &c.fields))
        .collect();

    cartesian_values(axes)
        .into_iter()
        .map(|values| {
            let fields = kept
                .remove(values.as_slice())
                .cloned()
                .unwrap_or_default();
            Combination { values, fields }
        })
        .collect()
}
