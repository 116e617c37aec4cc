//! Best bid/ask snapshot and its shared container.
//!
//! The streaming subscriber is the only writer; the trading loop reads.
//! Both sides of the book swap together as one immutable snapshot, so a
//! reader can never observe a bid from one tick paired with an ask from
//! another.

use crate::Price;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Best bid and best ask at a point in time.
///
/// No bid < ask invariant is enforced here; upstream data is trusted
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Best bid price.
    pub bid: Price,
    /// Best ask price.
    pub ask: Price,
    /// Timestamp when this quote was received.
    pub received_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(bid: Price, ask: Price) -> Self {
        Self {
            bid,
            ask,
            received_at: Utc::now(),
        }
    }

    /// Mid price: (bid + ask) / 2.
    pub fn mid(&self) -> Price {
        Price::new((self.bid.inner() + self.ask.inner()) / rust_decimal::Decimal::TWO)
    }

    /// Spread: ask - bid.
    pub fn spread(&self) -> Price {
        self.ask - self.bid
    }
}

/// Shared latest-quote state.
///
/// `None` until the first message arrives; no trading happens before
/// then. Publishing replaces the whole snapshot under a single write
/// lock, `latest` copies it out under a single read lock.
#[derive(Debug, Default)]
pub struct QuoteBoard {
    latest: RwLock<Option<Quote>>,
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, quote: Quote) {
        *self.latest.write() = Some(quote);
    }

    /// The most recent snapshot, if any quote has been observed yet.
    pub fn latest(&self) -> Option<Quote> {
        *self.latest.read()
    }
}
