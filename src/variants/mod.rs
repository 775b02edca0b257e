//! Product Variants
//!
//! State behind the product add/edit form: which variation axes and options
//! are selected, the combinations they generate, and the rules a product
//! must satisfy before it is submitted.
//!
//! ## Example
//!
//! ```rust
//! use depot::variants::VariantMatrix;
//!
//! let mut matrix = VariantMatrix::new();
//! matrix.add_axis("Size", ["S", "M"]);
//! matrix.add_axis("Color", ["Red", "Blue"]);
//! assert_eq!(matrix.combinations().len(), 4);
//!
//! matrix.deselect_option("Color", "Blue");
//! assert_eq!(matrix.combinations().len(), 2);
//! ```

mod generator;
mod validate;

pub use generator::{
    cartesian_values, regenerate, Combination, CombinationFields, VariationAxis, NAME_SEPARATOR,
};
pub use validate::{
    duplicate_barcodes, validate_combinations, validate_fields, VariantIssue, DESCRIPTION_MAX,
    DESCRIPTION_MIN, UNIVERSAL_LABEL,
};

use crate::models::{Product, ProductRequest, ProductVariant, Variation};

/// Selected axes and the combinations generated from them
#[derive(Debug, Clone, Default)]
pub struct VariantMatrix {
    axes: Vec<VariationAxis>,
    combinations: Vec<Combination>,
}

impl VariantMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the editing state of an existing product.
    ///
    /// Axes come from the variants' attributes in first-seen order; each
    /// stored variant's fields are carried onto its combination.
    pub fn from_product(product: &Product) -> Self {
        let mut axes: Vec<VariationAxis> = Vec::new();
        for attr in product.variants.iter().flat_map(|v| &v.attributes) {
            match axes.iter_mut().find(|a| a.name == attr.name) {
                Some(axis) if !axis.options.contains(&attr.value) => {
                    axis.options.push(attr.value.clone())
                }
                Some(_) => {}
                None => axes.push(VariationAxis::new(attr.name.clone(), [attr.value.clone()])),
            }
        }

        let previous: Vec<Combination> = product
            .variants
            .iter()
            .map(|v| Combination {
                values: v.attributes.clone(),
                fields: fields_from_variant(v),
            })
            .collect();

        let combinations = regenerate(&axes, &previous);
        Self { axes, combinations }
    }

    pub fn axes(&self) -> &[VariationAxis] {
        &self.axes
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn combinations_mut(&mut self) -> &mut [Combination] {
        &mut self.combinations
    }

    /// Find a combination by its `" / "`-joined display name
    pub fn find_mut(&mut self, display_name: &str) -> Option<&mut Combination> {
        self.combinations
            .iter_mut()
            .find(|c| c.display_name() == display_name)
    }

    /// Add (or replace the options of) an axis
    pub fn add_axis<I, S>(&mut self, name: &str, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let axis = VariationAxis::new(name, options);
        match self.axes.iter_mut().find(|a| a.name == name) {
            Some(existing) => *existing = axis,
            None => self.axes.push(axis),
        }
        self.regenerate();
    }

    /// Add an axis from a backend variation with none of its options selected
    pub fn add_variation(&mut self, variation: &Variation) {
        if self.axes.iter().all(|a| a.name != variation.name) {
            self.axes
                .push(VariationAxis::new(variation.name.clone(), Vec::<String>::new()));
            self.regenerate();
        }
    }

    pub fn remove_axis(&mut self, name: &str) {
        self.axes.retain(|a| a.name != name);
        self.regenerate();
    }

    /// Select an option on an axis; returns false when the axis is unknown
    pub fn select_option(&mut self, axis: &str, value: &str) -> bool {
        let Some(a) = self.axes.iter_mut().find(|a| a.name == axis) else {
            return false;
        };
        if !a.options.iter().any(|o| o == value) {
            a.options.push(value.to_string());
            self.regenerate();
        }
        true
    }

    /// Deselect an option on an axis; returns false when the axis is unknown
    pub fn deselect_option(&mut self, axis: &str, value: &str) -> bool {
        let Some(a) = self.axes.iter_mut().find(|a| a.name == axis) else {
            return false;
        };
        let before = a.options.len();
        a.options.retain(|o| o != value);
        if a.options.len() != before {
            self.regenerate();
        }
        true
    }

    fn regenerate(&mut self) {
        self.combinations = regenerate(&self.axes, &self.combinations);
        tracing::debug!(
            axes = self.axes.len(),
            combinations = self.combinations.len(),
            "Regenerated variant combinations"
        );
    }

    pub fn validate(&self, universal_barcodes: &[String]) -> Vec<VariantIssue> {
        validate_combinations(&self.combinations, universal_barcodes)
    }

    /// Variants for the enabled combinations, in generation order
    pub fn to_product_variants(&self) -> Vec<ProductVariant> {
        self.combinations
            .iter()
            .filter(|c| c.fields.enabled)
            .map(Combination::to_variant)
            .collect()
    }
}

fn fields_from_variant(variant: &ProductVariant) -> CombinationFields {
    let mut fields = CombinationFields {
        sku: variant.sku.clone().unwrap_or_default(),
        description: variant.description.clone(),
        price: Some(variant.price),
        enabled: variant.is_enabled,
        ..Default::default()
    };
    for (slot, code) in fields.barcodes.iter_mut().zip(&variant.barcodes) {
        *slot = code.clone();
    }
    fields
}

/// The single implicit variant of a universal product
pub fn universal_variant(fields: &CombinationFields) -> ProductVariant {
    fields.to_variant(Vec::new())
}

/// Build the create/update request for a product.
///
/// With no generated combinations the product is universal and carries the
/// universal fields as its only variant. Issues are returned instead of a
/// request when any rule fails.
pub fn build_product_request(
    name: &str,
    category: Option<String>,
    matrix: &VariantMatrix,
    universal: &CombinationFields,
) -> Result<ProductRequest, Vec<VariantIssue>> {
    let is_universal = matrix.combinations().is_empty();

    let issues = if is_universal {
        let mut issues = validate_fields(UNIVERSAL_LABEL, universal);
        issues.extend(validate_combinations(&[], &universal_barcodes(universal)));
        issues
    } else {
        matrix.validate(&universal_barcodes(universal))
    };
    if !issues.is_empty() {
        return Err(issues);
    }

    let variants = if is_universal {
        vec![universal_variant(universal)]
    } else {
        matrix.to_product_variants()
    };

    Ok(ProductRequest {
        name: name.trim().to_string(),
        category,
        brand: None,
        is_universal,
        variants,
    })
}

fn universal_barcodes(fields: &CombinationFields) -> Vec<String> {
    fields.barcodes().map(str::to_string).collect()
}
