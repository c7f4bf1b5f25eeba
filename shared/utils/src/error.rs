use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum QuotationError {
    #[error("Document read error: {path} - {message}")]
    DocumentRead { path: String, message: String },

    #[error("Row processing error: row {row} - {message}")]
    RowProcessing { row: usize, message: String },

    #[error("Persistence error: {sink} - {message}")]
    Persistence { sink: String, message: String },

    #[error("Notification error: {message}")]
    Notification { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl QuotationError {
    pub fn document_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentRead {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn row_processing(row: usize, message: impl Into<String>) -> Self {
        Self::RowProcessing {
            row,
            message: message.into(),
        }
    }

    pub fn persistence(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DocumentRead { .. } => "DOCUMENT_READ_ERROR",
            Self::RowProcessing { .. } => "ROW_PROCESSING_ERROR",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::Notification { .. } => "NOTIFICATION_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }
}

pub type QuotationResult<T> = Result<T, QuotationError>;

impl From<config::ConfigError> for QuotationError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}
