use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub email: EmailConfig,
    pub logging: LoggingConfig,
    pub quotation: QuotationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub mongodb_url: String,
    pub database_name: String,
    pub collection: String,
    pub connection_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    pub from_name: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationConfig {
    pub subject: String,
    pub currency_symbol: String,
    pub default_output_path: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Built-in defaults, so every file layer is optional
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with QUOTATION prefix
            .add_source(Environment::with_prefix("QUOTATION").separator("__"));

        config.build()?.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let sender = env::var("EMAIL").unwrap_or_default();

        Self {
            database: DatabaseConfig {
                mongodb_url: env::var("MONGO_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017/".to_string()),
                database_name: "garment_orders".to_string(),
                collection: "orders".to_string(),
                connection_timeout_seconds: 10,
            },
            email: EmailConfig {
                smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                smtp_port: env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                smtp_username: sender.clone(),
                smtp_password: env::var("EMAIL_PASSWORD").unwrap_or_default(),
                from_address: sender,
                from_name: "MORLY Team".to_string(),
                signature: "MORLY Team".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                file_path: None,
            },
            quotation: QuotationConfig {
                subject: "Costing Details".to_string(),
                currency_symbol: "$".to_string(),
                default_output_path: "costing_sheet.xlsx".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.database_name, "garment_orders");
        assert_eq!(config.database.collection, "orders");
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.quotation.subject, "Costing Details");
        assert_eq!(config.quotation.currency_symbol, "$");
    }

    #[test]
    fn test_load_without_files_falls_back_to_defaults() {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.database.collection, "orders");
        assert_eq!(config.logging.level, "info");
    }
}
