//! # Order Quotation Domain Models
//!
//! Core record types for the order quotation pipeline.
//!
//! ## Key Models
//!
//! - **RawRow**: one table body row, keyed by the table's header cells
//! - **ValidatedRow**: a RawRow known to carry `Placement` and `Qty`
//! - **NormalizedRow**: a priced order line with coerced quantity, rate and total
//! - **Quotation**: the aggregate quantity and cost of a batch
//! - **OutgoingEmail**: the notification handed to the mail transport

pub mod order;
pub mod quotation;
pub mod email;

#[cfg(test)]
pub mod property_tests;

pub use order::*;
pub use quotation::*;
pub use email::*;
