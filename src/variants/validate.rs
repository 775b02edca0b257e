//! Variant validation rules
//!
//! Enabled combinations need a description (10-1000 characters) and a
//! positive price. Barcodes must be unique across every enabled combination
//! and the universal product's own barcodes, compared exactly after
//! trimming. Disabled combinations are never checked.

use std::collections::HashMap;
use std::fmt;

use super::generator::{Combination, CombinationFields};

pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 1000;

/// Label used for the universal product in issue messages
pub const UNIVERSAL_LABEL: &str = "Universal";

/// A single rule violation, tied to the combination it was found on
#[derive(Debug, Clone, PartialEq)]
pub enum VariantIssue {
    MissingDescription { combination: String },
    DescriptionLength { combination: String, length: usize },
    InvalidPrice { combination: String },
    DuplicateBarcode {
        barcode: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for VariantIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantIssue::MissingDescription { combination } => {
                write!(f, "{}: description is required", combination)
            }
            VariantIssue::DescriptionLength { combination, length } => write!(
                f,
                "{}: description must be {}-{} characters (got {})",
                combination, DESCRIPTION_MIN, DESCRIPTION_MAX, length
            ),
            VariantIssue::InvalidPrice { combination } => {
                write!(f, "{}: price must be greater than 0", combination)
            }
            VariantIssue::DuplicateBarcode {
                barcode,
                first,
                second,
            } => write!(
                f,
                "Barcode {} is used by both {} and {}",
                barcode, first, second
            ),
        }
    }
}

/// Description and price checks for one set of fields
pub fn validate_fields(label: &str, fields: &CombinationFields) -> Vec<VariantIssue> {
    let mut issues = Vec::new();

    let length = fields.description.trim().chars().count();
    if length == 0 {
        issues.push(VariantIssue::MissingDescription {
            combination: label.to_string(),
        });
    } else if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&length) {
        issues.push(VariantIssue::DescriptionLength {
            combination: label.to_string(),
            length,
        });
    }

    if !fields.price.is_some_and(|p| p.is_finite() && p > 0.0) {
        issues.push(VariantIssue::InvalidPrice {
            combination: label.to_string(),
        });
    }

    issues
}

/// Validate every enabled combination plus cross-combination barcode
/// uniqueness. `universal_barcodes` are the product-level barcodes that
/// combinations may not reuse.
pub fn validate_combinations(
    combinations: &[Combination],
    universal_barcodes: &[String],
) -> Vec<VariantIssue> {
    let mut issues = Vec::new();
    let mut owners: HashMap<String, String> = HashMap::new();

    for barcode in universal_barcodes.iter().map(|b| b.trim()).filter(|b| !b.is_empty()) {
        claim_barcode(&mut owners, &mut issues, barcode, UNIVERSAL_LABEL);
    }

    for combo in combinations.iter().filter(|c| c.fields.enabled) {
        let label = combo.display_name();
        issues.extend(validate_fields(&label, &combo.fields));
        for barcode in combo.fields.barcodes() {
            claim_barcode(&mut owners, &mut issues, barcode, &label);
        }
    }

    issues
}

fn claim_barcode(
    owners: &mut HashMap<String, String>,
    issues: &mut Vec<VariantIssue>,
    barcode: &str,
    label: &str,
) {
    match owners.get(barcode) {
        Some(first) => issues.push(VariantIssue::DuplicateBarcode {
            barcode: barcode.to_string(),
            first: first.clone(),
            second: label.to_string(),
        }),
        None => {
            owners.insert(barcode.to_string(), label.to_string());
        }
    }
}

/// Barcodes (trimmed) that fail uniqueness, for highlighting inputs
pub fn duplicate_barcodes(issues: &[VariantIssue]) -> Vec<&str> {
    let mut out: Vec<&str> = issues
        .iter()
        .filter_map(|i| match i {
            VariantIssue::DuplicateBarcode { barcode, .. } => Some(barcode.as_str()),
            _ => None,
        })
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::generator::{regenerate, VariationAxis};

    fn filled(combos: &mut [Combination]) {
        for (i, c) in combos.iter_mut().enumerate() {
            c.fields.description = format!("Variant number {}", i);
            c.fields.price = Some(5.0);
        }
    }

    #[test]
    fn test_valid_combinations_have_no_issues() {
        let axes = vec![VariationAxis::new("Size", ["S", "M"])];
        let mut combos = regenerate(&axes, &[]);
        filled(&mut combos);
        combos[0].fields.barcodes[0] = "111".to_string();
        combos[1].fields.barcodes[0] = "222".to_string();
        assert!(validate_combinations(&combos, &[]).is_empty());
    }

    #[test]
    fn test_description_and_price_rules() {
        let axes = vec![VariationAxis::new("Size", ["S", "M", "L"])];
        let mut combos = regenerate(&axes, &[]);
        filled(&mut combos);
        combos[0].fields.description = "   ".to_string();
        combos[1].fields.description = "too short".to_string();
        combos[2].fields.price = Some(0.0);

        let issues = validate_combinations(&combos, &[]);
        assert_eq!(
            issues,
            vec![
                VariantIssue::MissingDescription { combination: "S".to_string() },
                VariantIssue::DescriptionLength { combination: "M".to_string(), length: 9 },
                VariantIssue::InvalidPrice { combination: "L".to_string() },
            ]
        );
    }

    #[test]
    fn test_description_upper_bound() {
        let fields = CombinationFields {
            description: "x".repeat(DESCRIPTION_MAX + 1),
            price: Some(1.0),
            ..Default::default()
        };
        assert_eq!(validate_fields("S", &fields).len(), 1);

        let fields = CombinationFields {
            description: "x".repeat(DESCRIPTION_MAX),
            price: Some(1.0),
            ..Default::default()
        };
        assert!(validate_fields("S", &fields).is_empty());
    }

    #[test]
    fn test_missing_price_is_invalid() {
        let fields = CombinationFields {
            description: "A long enough description".to_string(),
            price: None,
            ..Default::default()
        };
        assert_eq!(
            validate_fields("S", &fields),
            vec![VariantIssue::InvalidPrice { combination: "S".to_string() }]
        );
    }

    #[test]
    fn test_disabled_combinations_are_skipped() {
        let axes = vec![VariationAxis::new("Size", ["S", "M"])];
        let mut combos = regenerate(&axes, &[]);
        filled(&mut combos);
        combos[1].fields.enabled = false;
        combos[1].fields.description.clear();
        combos[0].fields.barcodes[0] = "111".to_string();
        combos[1].fields.barcodes[0] = "111".to_string();
        assert!(validate_combinations(&combos, &[]).is_empty());
    }

    #[test]
    fn test_duplicate_barcodes_after_trim() {
        let axes = vec![VariationAxis::new("Size", ["S", "M"])];
        let mut combos = regenerate(&axes, &[]);
        filled(&mut combos);
        combos[0].fields.barcodes[0] = "12345".to_string();
        combos[1].fields.barcodes[3] = " 12345 ".to_string();

        let issues = validate_combinations(&combos, &[]);
        assert_eq!(
            issues,
            vec![VariantIssue::DuplicateBarcode {
                barcode: "12345".to_string(),
                first: "S".to_string(),
                second: "M".to_string(),
            }]
        );
        assert_eq!(duplicate_barcodes(&issues), vec!["12345"]);
    }

    #[test]
    fn test_duplicate_against_universal_barcodes() {
        let axes = vec![VariationAxis::new("Size", ["S"])];
        let mut combos = regenerate(&axes, &[]);
        filled(&mut combos);
        combos[0].fields.barcodes[1] = "999".to_string();

        let issues = validate_combinations(&combos, &["999 ".to_string(), "".to_string()]);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("Universal"));
    }

    #[test]
    fn test_barcodes_are_case_sensitive() {
        let axes = vec![VariationAxis::new("Size", ["S", "M"])];
        let mut combos = regenerate(&axes, &[]);
        filled(&mut combos);
        combos[0].fields.barcodes[0] = "abc".to_string();
        combos[1].fields.barcodes[0] = "ABC".to_string();
        assert!(validate_combinations(&combos, &[]).is_empty());
    }
}
