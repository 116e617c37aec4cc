//! Signed REST client for the tickflow trading client.
//!
//! Covers the three operations the bot needs against the exchange REST
//! surface: exchange metadata fetch (unsigned), order placement and
//! cancel-all (signed). Request signing is HMAC-SHA256 over the exact
//! query string transmitted, with parameter insertion order preserved.

pub mod client;
pub mod error;
pub mod gateway;
pub mod signer;
pub mod types;

pub use client::{Credentials, RestClient};
pub use error::{RestError, RestResult};
pub use gateway::OrderGateway;
pub use signer::sign;
pub use types::{ExchangeInfo, OrderAck, SymbolInfo};
