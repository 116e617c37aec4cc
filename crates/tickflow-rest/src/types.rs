//! Wire types for the REST surface.
//!
//! Exchange metadata carries per-symbol filter objects tagged by
//! `filterType`; only the lot-size and price filters matter here, the
//! rest are ignored.

use rust_decimal::Decimal;
use serde::Deserialize;
use tickflow_core::{Price, Qty, SymbolFilters};

/// Exchange metadata (filters, limits) for all symbols.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

/// Per-symbol metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

/// One entry of a symbol's filter list.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "LOT_SIZE", rename_all = "camelCase")]
    LotSize {
        #[serde(with = "rust_decimal::serde::str")]
        step_size: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        min_qty: Decimal,
    },
    #[serde(rename = "PRICE_FILTER", rename_all = "camelCase")]
    PriceFilter {
        #[serde(with = "rust_decimal::serde::str")]
        tick_size: Decimal,
    },
    #[serde(other)]
    Other,
}

impl ExchangeInfo {
    /// Resolve the precision filters for one symbol.
    ///
    /// Returns `None` if the symbol is absent or lacks either filter.
    pub fn symbol_filters(&self, symbol: &str) -> Option<SymbolFilters> {
        let info = self.symbols.iter().find(|s| s.symbol == symbol)?;

        let mut tick_size = None;
        let mut step_size = None;
        let mut min_qty = None;
        for filter in &info.filters {
            match filter {
                SymbolFilter::LotSize {
                    step_size: step,
                    min_qty: min,
                } => {
                    step_size = Some(*step);
                    min_qty = Some(*min);
                }
                SymbolFilter::PriceFilter { tick_size: tick } => tick_size = Some(*tick),
                SymbolFilter::Other => {}
            }
        }

        Some(SymbolFilters::new(
            symbol,
            Price::new(tick_size?),
            Qty::new(step_size?),
            Qty::new(min_qty?),
        ))
    }
}

/// Acknowledgement returned by the order endpoint.
///
/// Only the fields the bot logs are modelled; everything else in the
/// response is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}
