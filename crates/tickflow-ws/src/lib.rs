//! Streaming book-ticker subscriber.
//!
//! Maintains one long-lived WebSocket connection per symbol, parses
//! best-bid/best-ask updates, republishes the latest quote, and
//! reconnects with a fixed delay on any failure. Market-data freshness
//! is worth more than fast failure here, so the retry policy is
//! unbounded; only external cancellation ends the stream.

pub mod connection;
pub mod error;
pub mod message;

pub use connection::{BookTickerSubscriber, StreamState, SubscriberConfig};
pub use error::{WsError, WsResult};
pub use message::parse_book_ticker;
