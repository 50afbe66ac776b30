use serde::{Deserialize, Serialize};

/// Inline stock edits offered next to each listed product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockAdjustment {
    Increment,
    /// Floors at zero.
    Decrement,
    Zero,
    Set(u32),
}

impl StockAdjustment {
    pub fn apply(self, current: u32) -> u32 {
        match self {
            StockAdjustment::Increment => current.saturating_add(1),
            StockAdjustment::Decrement => current.saturating_sub(1),
            StockAdjustment::Zero => 0,
            StockAdjustment::Set(n) => n,
        }
    }
}
