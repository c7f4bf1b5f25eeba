pub mod mongodb;
pub mod repositories;

pub use self::mongodb::{MongoClient, MongoDatabase, create_mongo_client, get_database};
pub use repositories::*;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use quotation_models::NormalizedRow;

/// Destination for a batch of priced order lines.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert the whole batch, returning how many records were written.
    async fn insert_many(&self, rows: &[NormalizedRow]) -> Result<u64>;

    /// Short label used in logs and stage reports.
    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub mongodb_url: String,
    pub database_name: String,
    pub collection: String,
    pub connection_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            mongodb_url: "mongodb://localhost:27017/".to_string(),
            database_name: "garment_orders".to_string(),
            collection: "orders".to_string(),
            connection_timeout: Duration::from_secs(10),
        }
    }
}

/// Connect to MongoDB and open the order line collection.
pub async fn initialize_order_store(config: &DatabaseConfig) -> Result<OrderLineRepository> {
    let client = create_mongo_client(&config.mongodb_url, config.connection_timeout).await?;
    let database = get_database(&client, &config.database_name);

    Ok(OrderLineRepository::new(&database, &config.collection))
}
