//! Decision loop driver and the reference trading heuristic.
//!
//! The driver consumes the latest quote, asks a pluggable decision
//! function for an order intent, normalizes it against the symbol
//! filters, and dispatches it through the order gateway. Every fifth
//! placed order triggers a cancel-all cleanup.

pub mod decide;
pub mod driver;

pub use decide::{Decide, RandomFlow, RandomFlowConfig};
pub use driver::{TradeLoop, TradeLoopConfig};
