use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const PLACEMENT_FIELD: &str = "Placement";
pub const QTY_FIELD: &str = "Qty";
pub const PER_RATE_FIELD: &str = "Per Rate";
pub const QUANTITY_FIELD: &str = "Quantity";
pub const TOTAL_FIELD: &str = "Total";

/// Fields every order line must carry to be priced.
pub const REQUIRED_FIELDS: [&str; 2] = [PLACEMENT_FIELD, QTY_FIELD];

/// A single table body row keyed by its table's header cells.
///
/// `None` marks a malformed cell, or a header with no cell under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub fields: IndexMap<String, Option<String>>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip a body row against its header positionally.
    ///
    /// Extra cells are dropped; headers past the end of the row map to `None`.
    /// A repeated header keeps its first position and the last value.
    pub fn from_cells(headers: &[String], cells: &[Option<String>]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), cells.get(i).cloned().flatten()))
            .collect();

        Self { fields }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, Option<V>)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }
}

/// A row known to carry the `Placement` and `Qty` keys.
///
/// Only key presence is guaranteed; the values may still be `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow(RawRow);

impl ValidatedRow {
    /// Wraps `row` if every required key is present.
    pub fn check(row: RawRow) -> Result<Self, RawRow> {
        if REQUIRED_FIELDS.iter().all(|field| row.contains_key(field)) {
            Ok(Self(row))
        } else {
            Err(row)
        }
    }

    pub fn placement(&self) -> Option<&str> {
        self.0.get(PLACEMENT_FIELD)
    }

    pub fn qty(&self) -> Option<&str> {
        self.0.get(QTY_FIELD)
    }

    pub fn per_rate(&self) -> Option<&str> {
        self.0.get(PER_RATE_FIELD)
    }

    pub fn into_raw(self) -> RawRow {
        self.0
    }
}

/// A flattened cell as handed to the document store and the spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => Self::Text(text),
            None => Self::Null,
        }
    }
}

/// A priced order line.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub quantity: f64,
    pub per_rate: f64,
    pub total: f64,
    /// Passthrough of the source row, in column order.
    pub extra: RawRow,
}

impl NormalizedRow {
    pub fn placement(&self) -> Option<&str> {
        self.extra.get(PLACEMENT_FIELD)
    }

    /// Flatten into an ordered record: derived fields first, then raw fields.
    ///
    /// Raw fields named `Quantity`, `Per Rate` or `Total` are shadowed by the
    /// derived values.
    pub fn to_record(&self) -> IndexMap<String, FieldValue> {
        let mut record = IndexMap::with_capacity(self.extra.len() + 3);
        record.insert(QUANTITY_FIELD.to_string(), FieldValue::Number(self.quantity));
        record.insert(PER_RATE_FIELD.to_string(), FieldValue::Number(self.per_rate));
        record.insert(TOTAL_FIELD.to_string(), FieldValue::Number(self.total));

        for (key, value) in &self.extra.fields {
            if !record.contains_key(key) {
                record.insert(key.clone(), FieldValue::from(value.clone()));
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_cells_pads_missing_and_drops_extra() {
        let short = RawRow::from_cells(
            &headers(&["Placement", "Qty", "Per Rate"]),
            &[Some("A".to_string())],
        );
        assert_eq!(short.get("Placement"), Some("A"));
        assert!(short.contains_key("Qty"));
        assert_eq!(short.get("Qty"), None);

        let long = RawRow::from_cells(
            &headers(&["Placement"]),
            &[Some("A".to_string()), Some("dropped".to_string())],
        );
        assert_eq!(long.len(), 1);
    }

    #[test]
    fn test_validated_row_requires_keys_not_values() {
        let row: RawRow = vec![("Placement", Some("A")), ("Qty", None)].into_iter().collect();
        let validated = ValidatedRow::check(row).unwrap();
        assert_eq!(validated.qty(), None);

        let row: RawRow = vec![("Placement", Some("A"))].into_iter().collect();
        assert!(ValidatedRow::check(row).is_err());
    }

    #[test]
    fn test_to_record_derived_fields_take_precedence() {
        let extra: RawRow = vec![
            ("Placement", Some("Shelf1")),
            ("Qty", Some("3")),
            ("Per Rate", Some("ten")),
            ("Total", Some("999")),
        ]
        .into_iter()
        .collect();

        let row = NormalizedRow {
            quantity: 3.0,
            per_rate: 0.0,
            total: 0.0,
            extra,
        };

        let record = row.to_record();
        let keys: Vec<&str> = record.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Quantity", "Per Rate", "Total", "Placement", "Qty"]);
        assert_eq!(record["Per Rate"], FieldValue::Number(0.0));
        assert_eq!(record["Total"], FieldValue::Number(0.0));
        assert_eq!(record["Qty"], FieldValue::Text("3".to_string()));
    }
}
