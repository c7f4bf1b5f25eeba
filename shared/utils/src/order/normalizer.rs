//! Order Row Normalizer
//!
//! Prices validated rows: coerces `Qty` and `Per Rate` and computes `Total`.

use quotation_models::{NormalizedRow, ValidatedRow};

use crate::error::{QuotationError, QuotationResult};

/// Strict numeric check: after removing at most one `.`, the text must be
/// non-empty and made of ASCII digits only.
///
/// Signs, exponents, whitespace and thousands separators all fail.
pub fn is_strict_number(raw: &str) -> bool {
    let digits = raw.replacen('.', "", 1);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Coerce a raw cell to a number, falling back to `0.0` on any deviation
/// from [`is_strict_number`].
pub fn coerce_number(raw: Option<&str>) -> f64 {
    match raw {
        Some(text) if is_strict_number(text) => text.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Rows that survived normalization plus the errors of those that did not.
#[derive(Debug, Clone, Default)]
pub struct NormalizationResult {
    pub rows: Vec<NormalizedRow>,
    pub dropped: Vec<QuotationError>,
}

#[derive(Debug, Default)]
pub struct RowNormalizer;

impl RowNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Price one row. `index` is only used to label errors.
    pub fn normalize(&self, index: usize, row: ValidatedRow) -> QuotationResult<NormalizedRow> {
        let quantity = coerce_number(row.qty());
        let per_rate = coerce_number(row.per_rate());
        let total = quantity * per_rate;

        if !quantity.is_finite() || !per_rate.is_finite() || !total.is_finite() {
            return Err(QuotationError::row_processing(
                index,
                format!(
                    "non-finite amount (quantity={}, per_rate={}, total={})",
                    quantity, per_rate, total
                ),
            ));
        }

        Ok(NormalizedRow {
            quantity,
            per_rate,
            total,
            extra: row.into_raw(),
        })
    }

    /// Price every row, dropping and logging the ones that fail.
    pub fn normalize_batch(&self, rows: Vec<ValidatedRow>) -> NormalizationResult {
        let mut result = NormalizationResult::default();

        for (idx, row) in rows.into_iter().enumerate() {
            match self.normalize(idx, row) {
                Ok(normalized) => result.rows.push(normalized),
                Err(e) => {
                    tracing::warn!(error = %e, "Error processing row; dropped");
                    result.dropped.push(e);
                }
            }
        }

        result
    }
}
