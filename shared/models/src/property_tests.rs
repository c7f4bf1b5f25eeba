//! Property-based tests for the order record models.

use proptest::prelude::*;
use proptest::option;

use crate::{FieldValue, NormalizedRow, RawRow, ValidatedRow, PER_RATE_FIELD, QUANTITY_FIELD, TOTAL_FIELD};

prop_compose! {
    fn arb_header()(names in prop::collection::vec("[A-Za-z ]{1,12}", 1..8)) -> Vec<String> {
        names
    }
}

prop_compose! {
    fn arb_cells()(cells in prop::collection::vec(option::of("[A-Za-z0-9.]{0,8}"), 0..10)) -> Vec<Option<String>> {
        cells
    }
}

proptest! {
    #[test]
    fn prop_from_cells_keys_come_from_header(headers in arb_header(), cells in arb_cells()) {
        let row = RawRow::from_cells(&headers, &cells);

        // Every key is a header; duplicate headers collapse.
        for key in row.fields.keys() {
            prop_assert!(headers.contains(key));
        }
        prop_assert!(row.len() <= headers.len());
    }

    #[test]
    fn prop_validation_is_key_presence(headers in arb_header(), cells in arb_cells()) {
        let row = RawRow::from_cells(&headers, &cells);
        let has_keys = row.contains_key("Placement") && row.contains_key("Qty");
        prop_assert_eq!(ValidatedRow::check(row).is_ok(), has_keys);
    }

    #[test]
    fn prop_record_always_leads_with_derived_fields(
        headers in arb_header(),
        cells in arb_cells(),
        quantity in 0.0f64..1e6,
        per_rate in 0.0f64..1e6,
    ) {
        let row = NormalizedRow {
            quantity,
            per_rate,
            total: quantity * per_rate,
            extra: RawRow::from_cells(&headers, &cells),
        };

        let record = row.to_record();
        let keys: Vec<&String> = record.keys().take(3).collect();
        prop_assert_eq!(keys, vec![QUANTITY_FIELD, PER_RATE_FIELD, TOTAL_FIELD]);
        prop_assert_eq!(&record[TOTAL_FIELD], &FieldValue::Number(quantity * per_rate));
    }
}
