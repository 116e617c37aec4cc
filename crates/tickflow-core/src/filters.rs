//! Exchange-imposed precision constraints for a traded symbol.
//!
//! Fetched once at startup from exchange metadata and immutable for the
//! session. Candidate prices and quantities must pass through these
//! filters before any order is submitted.

use crate::decimal::round_to_step;
use crate::error::{CoreError, Result};
use crate::{Price, Qty};
use serde::{Deserialize, Serialize};

/// Tick size, lot size, and minimum quantity for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFilters {
    /// Traded symbol, e.g. "SOLUSDT".
    pub symbol: String,
    /// Minimum price increment.
    pub tick_size: Price,
    /// Minimum quantity increment.
    pub step_size: Qty,
    /// Minimum order quantity.
    pub min_qty: Qty,
}

impl SymbolFilters {
    pub fn new(symbol: impl Into<String>, tick_size: Price, step_size: Qty, min_qty: Qty) -> Self {
        Self {
            symbol: symbol.into(),
            tick_size,
            step_size,
            min_qty,
        }
    }

    /// Conservative defaults used when the metadata fetch fails.
    pub fn conservative(symbol: impl Into<String>) -> Self {
        use rust_decimal::Decimal;
        Self {
            symbol: symbol.into(),
            tick_size: Price::new(Decimal::new(1, 2)),
            step_size: Qty::new(Decimal::ONE),
            min_qty: Qty::new(Decimal::new(1, 3)),
        }
    }

    /// Validate the filter invariants: positive steps, non-negative minimum.
    pub fn validate(&self) -> Result<()> {
        if !self.tick_size.is_positive() {
            return Err(CoreError::InvalidFilters(format!(
                "tick_size must be > 0, got {}",
                self.tick_size
            )));
        }
        if !self.step_size.is_positive() {
            return Err(CoreError::InvalidFilters(format!(
                "step_size must be > 0, got {}",
                self.step_size
            )));
        }
        if self.min_qty.inner().is_sign_negative() {
            return Err(CoreError::InvalidFilters(format!(
                "min_qty must be >= 0, got {}",
                self.min_qty
            )));
        }
        Ok(())
    }

    /// Round a candidate price to the tick grid.
    pub fn normalize_price(&self, price: Price) -> Price {
        price.round_to_tick(self.tick_size)
    }

    /// Round a candidate quantity to the lot grid, flooring at `min_qty`.
    ///
    /// If the rounded value falls below the minimum, the minimum is
    /// substituted and step-rounded once more so the floor itself is
    /// lot-aligned.
    pub fn normalize_qty(&self, qty: Qty) -> Qty {
        let mut rounded = qty.round_to_lot(self.step_size);
        if rounded < self.min_qty {
            rounded = Qty::new(round_to_step(self.min_qty.inner(), self.step_size.inner()));
        }
        rounded
    }
}
