//! Order Quotation Service
//!
//! Prices the order lines of a tabular document, stores them, writes the
//! costing sheet and emails the resulting quotation.

pub mod pipeline;
pub mod spreadsheet;

pub use pipeline::{ContinuePolicy, Pipeline, PipelineReport, RunRequest, StageOutcome, UnavailableStore};
pub use spreadsheet::{column_union, SheetFormat, SheetWriter, SpreadsheetSink};
