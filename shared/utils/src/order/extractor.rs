//! Table Row Extractor
//!
//! Turns the tables of a parsed document into raw rows keyed by each
//! table's header.

use std::path::Path;

use quotation_models::RawRow;

use super::parser::{DocumentParser, ParsedDocument};
use crate::error::QuotationError;

/// Outcome of reading one document.
///
/// A document that could not be read yields no rows at all, never a partial
/// set; the cause is kept in `failure`.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: ParsedDocument,
    pub failure: Option<QuotationError>,
}

impl Extraction {
    pub fn from_document(document: ParsedDocument) -> Self {
        Self {
            document,
            failure: None,
        }
    }

    pub fn failed(filename: impl Into<String>, error: QuotationError) -> Self {
        Self {
            document: ParsedDocument::empty(filename),
            failure: Some(error),
        }
    }

    /// Body rows in page order, then table order, then row order.
    pub fn rows(&self) -> impl Iterator<Item = RawRow> + '_ {
        table_rows(&self.document)
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn table_count(&self) -> usize {
        self.document.table_count()
    }
}

/// Lazily zip every table body row against its header.
pub fn table_rows(document: &ParsedDocument) -> impl Iterator<Item = RawRow> + '_ {
    document
        .pages
        .iter()
        .flat_map(|page| page.tables.iter())
        .flat_map(|table| {
            let header = table.header();
            table
                .body()
                .iter()
                .map(move |cells| RawRow::from_cells(&header, cells))
        })
}

/// Row extractor over a document parser
#[derive(Default)]
pub struct TableExtractor {
    parser: DocumentParser,
}

impl TableExtractor {
    pub fn new(parser: DocumentParser) -> Self {
        Self { parser }
    }

    /// Read `path` and prepare its rows for extraction.
    ///
    /// Read errors are logged and turned into an empty extraction.
    pub fn extract(&self, path: &Path) -> Extraction {
        match self.parser.parse_file(path) {
            Ok(document) => {
                tracing::info!(
                    document = %document.filename,
                    pages = document.pages.len(),
                    tables = document.table_count(),
                    "Document parsed"
                );
                Extraction::from_document(document)
            }
            Err(e) => {
                let error = QuotationError::document_read(path.display().to_string(), format!("{:#}", e));
                tracing::error!(error = %error, "Error reading document; continuing with no rows");
                Extraction::failed(path.display().to_string(), error)
            }
        }
    }
}
