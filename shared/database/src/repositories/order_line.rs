//! Order Line Repository
//!
//! Bulk inserts of priced order lines into MongoDB.

use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use mongodb::Collection;

use quotation_models::{FieldValue, NormalizedRow};

use crate::mongodb::MongoDatabase;
use crate::RecordStore;

pub struct OrderLineRepository {
    collection: Collection<Document>,
}

impl OrderLineRepository {
    pub fn new(database: &MongoDatabase, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// Insert all rows as one batch. An empty batch is not sent.
    pub async fn insert_batch(&self, rows: &[NormalizedRow]) -> Result<u64> {
        if rows.is_empty() {
            tracing::debug!("No order lines to insert");
            return Ok(0);
        }

        let documents: Vec<Document> = rows.iter().map(to_document).collect();

        let result = self
            .collection
            .insert_many(documents, None)
            .await
            .with_context(|| format!("Failed to insert order lines into {}", self.collection.name()))?;

        Ok(result.inserted_ids.len() as u64)
    }

    /// Count every stored order line
    pub async fn count(&self) -> Result<u64> {
        self.collection
            .count_documents(None, None)
            .await
            .context("Failed to count order lines")
    }
}

#[async_trait]
impl RecordStore for OrderLineRepository {
    async fn insert_many(&self, rows: &[NormalizedRow]) -> Result<u64> {
        self.insert_batch(rows).await
    }

    fn name(&self) -> &str {
        "mongodb"
    }
}

/// Flatten one order line into a BSON document, derived fields first.
pub fn to_document(row: &NormalizedRow) -> Document {
    let mut document = Document::new();

    for (key, value) in row.to_record() {
        let value = match value {
            FieldValue::Number(n) => Bson::Double(n),
            FieldValue::Text(s) => Bson::String(s),
            FieldValue::Null => Bson::Null,
        };
        document.insert(key, value);
    }

    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotation_models::RawRow;

    #[test]
    fn test_to_document() {
        let extra: RawRow = vec![
            ("Placement", Some("Shelf1")),
            ("Qty", Some("3")),
            ("Per Rate", Some("10")),
            ("Colour", None),
        ]
        .into_iter()
        .collect();

        let row = NormalizedRow {
            quantity: 3.0,
            per_rate: 10.0,
            total: 30.0,
            extra,
        };

        let document = to_document(&row);

        let keys: Vec<&String> = document.keys().collect();
        assert_eq!(keys, vec!["Quantity", "Per Rate", "Total", "Placement", "Qty", "Colour"]);
        assert_eq!(document.get_f64("Per Rate").unwrap(), 10.0);
        assert_eq!(document.get_f64("Total").unwrap(), 30.0);
        assert_eq!(document.get_str("Qty").unwrap(), "3");
        assert_eq!(document.get("Colour"), Some(&Bson::Null));
    }
}
