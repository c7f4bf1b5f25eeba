//! Repository module for document store writes
//!
//! Provides typed repository implementations for persisted order records.

pub mod order_line;

pub use order_line::{OrderLineRepository, to_document};
