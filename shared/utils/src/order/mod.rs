//! Order Processing Module
//!
//! Extraction and normalization of tabular order documents into priced
//! order lines, and the quotation derived from them.
//!
//! Stages, in pipeline order: parser → extractor → validator → normalizer →
//! aggregator.

pub mod parser;
pub mod extractor;
pub mod validator;
pub mod normalizer;
pub mod aggregator;

pub use parser::{DocumentParser, DocumentFormat, ParsedDocument, DocumentPage, DetectedTable, Cell};
pub use extractor::{TableExtractor, Extraction, table_rows};
pub use validator::{RowValidator, ValidationResult, ValidationSummary};
pub use normalizer::{RowNormalizer, NormalizationResult, coerce_number, is_strict_number};
pub use aggregator::{QuotationAggregator, OVERRIDE_QUANTITY, OVERRIDE_UNIT_COST};
