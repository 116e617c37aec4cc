//! Core domain types for the tickflow trading client.
//!
//! This crate provides the fundamental types shared by the other crates:
//! - `Price`, `Qty`: precision-safe numeric types with step rounding
//! - `SymbolFilters`: exchange-imposed precision constraints
//! - `Quote`, `QuoteBoard`: best bid/ask snapshot and its shared container
//! - `Side`, `OrderType`, `TimeInForce`, `OrderIntent`: trading enums

pub mod decimal;
pub mod error;
pub mod filters;
pub mod order;
pub mod quote;

pub use decimal::{round_to_step, Price, Qty};
pub use error::{CoreError, Result};
pub use filters::SymbolFilters;
pub use order::{OrderIntent, OrderType, Side, TimeInForce};
pub use quote::{Quote, QuoteBoard};
