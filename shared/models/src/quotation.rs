use serde::{Deserialize, Serialize};

/// Aggregate over one batch of priced order lines. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub total_qty: f64,
    pub total_cost: f64,
}

impl Quotation {
    pub fn new(total_qty: f64, total_cost: f64) -> Self {
        Self {
            total_qty,
            total_cost,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_qty == 0.0 && self.total_cost == 0.0
    }
}
