//! Book-ticker connection lifecycle.
//!
//! Explicit state machine: NotConnected -> Connecting -> Connected ->
//! (ClosingWithError | ClosingClean) -> NotConnected, looping forever.
//! Terminal only on external cancellation. Every failure path waits a
//! fixed delay and reconnects; malformed frames are logged and skipped
//! without touching the connection.

use crate::error::{WsError, WsResult};
use crate::message::parse_book_ticker;
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tickflow_core::{Quote, QuoteBoard};

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Stream base URL, e.g. "wss://stream.binancefuture.com/ws".
    pub ws_url: String,
    /// Traded symbol; lower-cased when building the stream path.
    pub symbol: String,
    /// Delay between reconnection attempts.
    pub reconnect_delay: Duration,
}

impl SubscriberConfig {
    pub fn new(ws_url: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            symbol: symbol.into(),
            reconnect_delay: Duration::from_secs(5),
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Full stream endpoint for the book-ticker channel.
    pub fn stream_url(&self) -> String {
        format!(
            "{}/{}@bookTicker",
            self.ws_url.trim_end_matches('/'),
            self.symbol.to_lowercase()
        )
    }
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    NotConnected,
    Connecting,
    Connected,
    ClosingWithError,
    ClosingClean,
}

/// Resilient book-ticker subscriber.
///
/// Publishes every valid quote to the shared board and, when a channel
/// is attached, forwards it downstream as well. Forwarding is best
/// effort: a full or closed receiver never stalls ingestion.
pub struct BookTickerSubscriber {
    config: SubscriberConfig,
    state: Arc<RwLock<StreamState>>,
    board: Arc<QuoteBoard>,
    update_tx: Option<mpsc::Sender<Quote>>,
    shutdown: CancellationToken,
}

impl BookTickerSubscriber {
    pub fn new(config: SubscriberConfig, board: Arc<QuoteBoard>, shutdown: CancellationToken) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(StreamState::NotConnected)),
            board,
            update_tx: None,
            shutdown,
        }
    }

    /// Attach a downstream channel receiving every valid quote.
    pub fn with_updates(mut self, tx: mpsc::Sender<Quote>) -> Self {
        self.update_tx = Some(tx);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        *self.state.read()
    }

    fn set_state(&self, state: StreamState) {
        *self.state.write() = state;
    }

    /// Run the subscription until cancelled. Not restartable afterwards.
    pub async fn run(&self) -> WsResult<()> {
        let url = self.config.stream_url();

        loop {
            if self.shutdown.is_cancelled() {
                self.set_state(StreamState::ClosingClean);
                self.set_state(StreamState::NotConnected);
                return Ok(());
            }

            self.set_state(StreamState::Connecting);

            match self.run_connection(&url).await {
                Ok(()) => {
                    // Only clean shutdown exits the connection loop with Ok.
                    info!(symbol = %self.config.symbol, "Stream shut down cleanly");
                    self.set_state(StreamState::ClosingClean);
                    self.set_state(StreamState::NotConnected);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        delay_ms = self.config.reconnect_delay.as_millis(),
                        "Stream error, reconnecting after delay"
                    );
                    self.set_state(StreamState::ClosingWithError);
                    self.set_state(StreamState::NotConnected);
                }
            }

            tokio::select! {
                () = tokio::time::sleep(self.config.reconnect_delay) => {}
                () = self.shutdown.cancelled() => {
                    info!("Shutdown requested during reconnect delay");
                    return Ok(());
                }
            }
        }
    }

    async fn run_connection(&self, url: &str) -> WsResult<()> {
        debug!(%url, "Connecting to stream");

        let (ws_stream, _response) = connect_async_tls_with_config(url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        self.set_state(StreamState::Connected);
        info!(%url, "Stream connected");

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!(error = %e, "Failed to send Close frame during shutdown");
                    }
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => self.handle_frame(&text),
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            warn!(code, %reason, "Stream closed by server");
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => return Err(e.into()),
                        None => return Err(WsError::StreamEnded),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_frame(&self, text: &str) {
        match parse_book_ticker(text) {
            Ok(quote) => {
                self.board.publish(quote);
                if let Some(tx) = &self.update_tx {
                    // Best effort; lagging consumers never block ingestion.
                    let _ = tx.try_send(quote);
                }
            }
            Err(e) => {
                warn!(error = %e, "Skipping malformed quote message");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_lowercases_symbol() {
        let config = SubscriberConfig::new("wss://stream.binancefuture.com/ws", "SOLUSDT");
        assert_eq!(
            config.stream_url(),
            "wss://stream.binancefuture.com/ws/solusdt@bookTicker"
        );
    }

    #[test]
    fn test_stream_url_tolerates_trailing_slash() {
        let config = SubscriberConfig::new("ws://127.0.0.1:9000/", "btcusdt");
        assert_eq!(config.stream_url(), "ws://127.0.0.1:9000/btcusdt@bookTicker");
    }

    #[test]
    fn test_default_reconnect_delay() {
        let config = SubscriberConfig::new("wss://example", "SOLUSDT");
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_initial_state_not_connected() {
        let sub = BookTickerSubscriber::new(
            SubscriberConfig::new("wss://example", "SOLUSDT"),
            Arc::new(QuoteBoard::new()),
            CancellationToken::new(),
        );
        assert_eq!(sub.state(), StreamState::NotConnected);
    }
}
