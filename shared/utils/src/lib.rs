pub mod config;
pub mod logging;
pub mod error;
pub mod validation;
pub mod order;

pub use self::config::*;
pub use logging::*;
pub use error::*;
pub use validation::*;
pub use order::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading() {
        let config = AppConfig::default();
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.email.smtp_host, "smtp.gmail.com");
    }

    #[test]
    fn test_error_handling() {
        let error = QuotationError::validation("to", "bad address");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");

        let error = QuotationError::persistence("spreadsheet", "disk full");
        assert_eq!(error.error_code(), "PERSISTENCE_ERROR");
    }
}
