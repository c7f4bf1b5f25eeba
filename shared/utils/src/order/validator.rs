//! Order Row Validator
//!
//! Keeps the rows that carry every required order field.

use std::collections::BTreeMap;

use quotation_models::{RawRow, ValidatedRow, REQUIRED_FIELDS};

use crate::validation::missing_required_fields;

/// Summary statistics for validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    /// Rejected rows per missing field; a row missing both counts twice.
    pub missing_fields: BTreeMap<String, usize>,
}

/// Validation result for a batch of rows
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub rows: Vec<ValidatedRow>,
    pub summary: ValidationSummary,
}

/// Order row validator
///
/// Checks key presence only: a row whose `Qty` cell is empty still passes
/// and prices as zero downstream.
#[derive(Debug, Default)]
pub struct RowValidator;

impl RowValidator {
    pub fn new() -> Self {
        Self
    }

    /// Order-preserving filter over `rows`
    pub fn validate(&self, rows: impl IntoIterator<Item = RawRow>) -> ValidationResult {
        let mut valid = Vec::new();
        let mut summary = ValidationSummary::default();

        for (idx, row) in rows.into_iter().enumerate() {
            summary.total_rows += 1;

            match ValidatedRow::check(row) {
                Ok(validated) => valid.push(validated),
                Err(rejected) => {
                    let missing = missing_required_fields(|k| rejected.contains_key(k), &REQUIRED_FIELDS);
                    tracing::debug!(row = idx, missing = ?missing, "Row rejected");
                    for field in missing {
                        *summary.missing_fields.entry(field.to_string()).or_default() += 1;
                    }
                    summary.invalid_rows += 1;
                }
            }
        }

        summary.valid_rows = valid.len();

        ValidationResult {
            rows: valid,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, Option<&str>)]) -> RawRow {
        fields.iter().map(|(k, v)| (*k, v.map(|s| s.to_string()))).collect()
    }

    #[test]
    fn test_excludes_rows_missing_required_keys() {
        let rows = vec![
            row(&[("Placement", Some("A")), ("Qty", Some("1")), ("Per Rate", Some("5"))]),
            row(&[("Placement", Some("B")), ("Per Rate", Some("5")), ("Colour", Some("Red"))]),
            row(&[("Qty", Some("3")), ("Per Rate", Some("5"))]),
            row(&[("Per Rate", Some("5"))]),
        ];

        let result = RowValidator::new().validate(rows);

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].placement(), Some("A"));
        assert_eq!(result.summary.total_rows, 4);
        assert_eq!(result.summary.invalid_rows, 3);
        assert_eq!(result.summary.missing_fields["Qty"], 2);
        assert_eq!(result.summary.missing_fields["Placement"], 2);
    }

    #[test]
    fn test_null_values_pass_validation() {
        let result = RowValidator::new().validate(vec![row(&[("Placement", None), ("Qty", None)])]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].qty(), None);
    }

    #[test]
    fn test_order_is_preserved() {
        let rows = vec![
            row(&[("Placement", Some("1")), ("Qty", Some("1"))]),
            row(&[("Placement", Some("skip"))]),
            row(&[("Placement", Some("2")), ("Qty", Some("1"))]),
            row(&[("Placement", Some("3")), ("Qty", Some("1"))]),
        ];

        let result = RowValidator::new().validate(rows);
        let placements: Vec<_> = result.rows.iter().filter_map(|r| r.placement()).collect();
        assert_eq!(placements, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_input() {
        let result = RowValidator::new().validate(Vec::new());
        assert!(result.rows.is_empty());
        assert_eq!(result.summary, ValidationSummary::default());
    }
}
