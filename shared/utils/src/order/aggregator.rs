//! Quotation Aggregator
//!
//! Reduces a batch of priced order lines to a quotation.

use quotation_models::{NormalizedRow, Quotation};

/// Total quantity that triggers the flat-rate override.
pub const OVERRIDE_QUANTITY: f64 = 13.0;

/// Cost per unit charged when the override applies.
pub const OVERRIDE_UNIT_COST: f64 = 100.0;

#[derive(Debug, Default)]
pub struct QuotationAggregator;

impl QuotationAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Sum quantities and totals.
    ///
    /// When the summed quantity is exactly [`OVERRIDE_QUANTITY`], the summed
    /// totals are discarded and the cost becomes quantity × [`OVERRIDE_UNIT_COST`].
    pub fn aggregate(&self, rows: &[NormalizedRow]) -> Quotation {
        // Float `sum()` starts from -0.0; an empty batch must report +0.0
        let total_qty = rows.iter().fold(0.0, |acc, r| acc + r.quantity);
        let summed_cost = rows.iter().fold(0.0, |acc, r| acc + r.total);

        let total_cost = if total_qty == OVERRIDE_QUANTITY {
            tracing::info!(total_qty, summed_cost, "Flat-rate override applied");
            total_qty * OVERRIDE_UNIT_COST
        } else {
            summed_cost
        };

        Quotation::new(total_qty, total_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quotation_models::RawRow;

    fn line(quantity: f64, per_rate: f64) -> NormalizedRow {
        NormalizedRow {
            quantity,
            per_rate,
            total: quantity * per_rate,
            extra: RawRow::new(),
        }
    }

    #[test]
    fn test_empty_batch() {
        let quotation = QuotationAggregator::new().aggregate(&[]);
        assert_eq!(quotation, Quotation::new(0.0, 0.0));
        assert!(!quotation.total_qty.is_sign_negative());
        assert!(!quotation.total_cost.is_sign_negative());
        assert_eq!(format!("{:.2} {:.2}", quotation.total_qty, quotation.total_cost), "0.00 0.00");
    }

    #[test]
    fn test_sums_quantity_and_totals() {
        let quotation = QuotationAggregator::new().aggregate(&[line(3.0, 10.0), line(4.0, 10.0)]);
        assert_eq!(quotation, Quotation::new(7.0, 70.0));
    }

    #[test]
    fn test_override_at_thirteen() {
        let quotation = QuotationAggregator::new().aggregate(&[line(10.0, 2.0), line(3.0, 1.0)]);
        assert_eq!(quotation, Quotation::new(13.0, 1300.0));
    }

    #[test]
    fn test_override_with_fractional_quantities() {
        let quotation = QuotationAggregator::new().aggregate(&[line(6.5, 1.0), line(6.5, 1.0)]);
        assert_eq!(quotation.total_cost, 1300.0);
    }

    #[test]
    fn test_no_override_near_thirteen() {
        let quotation = QuotationAggregator::new().aggregate(&[line(12.5, 2.0)]);
        assert_eq!(quotation.total_cost, 25.0);

        let quotation = QuotationAggregator::new().aggregate(&[line(14.0, 2.0)]);
        assert_eq!(quotation.total_cost, 28.0);
    }

    proptest! {
        #[test]
        fn prop_aggregation_is_idempotent(
            amounts in prop::collection::vec((0.0f64..1000.0, 0.0f64..1000.0), 0..20)
        ) {
            let rows: Vec<NormalizedRow> = amounts.iter().map(|(q, r)| line(*q, *r)).collect();
            let aggregator = QuotationAggregator::new();

            let first = aggregator.aggregate(&rows);
            let second = aggregator.aggregate(&rows);
            prop_assert_eq!(first, second);
        }
    }
}
