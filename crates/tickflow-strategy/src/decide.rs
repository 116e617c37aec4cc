//! Decision function seam and the reference heuristic.
//!
//! The trading heuristic is deliberately swappable: the driver only
//! knows `decide(quote, filters) -> OrderIntent`. The reference
//! implementation reproduces the randomized flow generator: coin-flip
//! side, price offset a few percent from mid, quantity sized to a fixed
//! target notional.

use rand::Rng;
use rust_decimal::Decimal;
use tickflow_core::{OrderIntent, Price, Qty, Quote, Side, SymbolFilters};

/// Decision function consumed by the trading loop.
pub trait Decide: Send {
    fn decide(&mut self, quote: &Quote, filters: &SymbolFilters) -> OrderIntent;
}

/// Configuration for the randomized reference heuristic.
#[derive(Debug, Clone)]
pub struct RandomFlowConfig {
    /// Target notional per order, in quote currency.
    pub target_notional: Decimal,
    /// Price offset from mid, as a fraction (0.05 = 5%).
    pub price_offset_pct: Decimal,
}

impl Default for RandomFlowConfig {
    fn default() -> Self {
        Self {
            target_notional: Decimal::from(50),
            price_offset_pct: Decimal::new(5, 2),
        }
    }
}

/// Randomized order-flow heuristic.
///
/// Buys below / sells above the mid so resting orders rarely fill
/// immediately.
#[derive(Debug, Clone, Default)]
pub struct RandomFlow {
    config: RandomFlowConfig,
}

impl RandomFlow {
    pub fn new(config: RandomFlowConfig) -> Self {
        Self { config }
    }
}

impl Decide for RandomFlow {
    fn decide(&mut self, quote: &Quote, filters: &SymbolFilters) -> OrderIntent {
        let side = if rand::thread_rng().gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };

        let mid = quote.mid().inner();
        let offset = mid * self.config.price_offset_pct;
        let price = match side {
            Side::Buy => mid - offset,
            Side::Sell => mid + offset,
        };

        let mut qty = if price.is_zero() {
            filters.min_qty.inner()
        } else {
            self.config.target_notional / price
        };
        if qty < filters.min_qty.inner() {
            qty = filters.min_qty.inner();
        }

        OrderIntent::new(side, Price::new(price), Qty::new(qty))
    }
}
