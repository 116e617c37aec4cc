//! Periodic decision loop.
//!
//! Each cycle sleeps a randomized interval, snapshots the latest quote,
//! asks the decision function for an intent, normalizes it, and places
//! the order. A rejected or failed order aborts the cycle, never the
//! loop. Every `cleanup_every` placed orders, all open orders for the
//! symbol are cancelled and the counter resets regardless of the cancel
//! outcome.

use crate::decide::Decide;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tickflow_core::{QuoteBoard, SymbolFilters};
use tickflow_rest::OrderGateway;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Trading loop configuration.
#[derive(Debug, Clone)]
pub struct TradeLoopConfig {
    /// Traded symbol.
    pub symbol: String,
    /// Lower bound of the randomized cycle interval.
    pub min_interval: Duration,
    /// Upper bound of the randomized cycle interval.
    pub max_interval: Duration,
    /// Cancel all open orders after this many placements.
    pub cleanup_every: u32,
}

impl TradeLoopConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            min_interval: Duration::from_secs(3),
            max_interval: Duration::from_secs(7),
            cleanup_every: 5,
        }
    }
}

/// Decision loop driver.
///
/// Runs concurrently with the quote subscriber; the two share only the
/// quote board. The driver never drives or blocks on the subscriber.
pub struct TradeLoop<D, G: ?Sized> {
    config: TradeLoopConfig,
    decide: D,
    gateway: Arc<G>,
    board: Arc<QuoteBoard>,
    filters: SymbolFilters,
    orders_since_cleanup: u32,
    shutdown: CancellationToken,
}

impl<D, G> TradeLoop<D, G>
where
    D: Decide,
    G: OrderGateway + ?Sized,
{
    pub fn new(
        config: TradeLoopConfig,
        decide: D,
        gateway: Arc<G>,
        board: Arc<QuoteBoard>,
        filters: SymbolFilters,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            decide,
            gateway,
            board,
            filters,
            orders_since_cleanup: 0,
            shutdown,
        }
    }

    /// Run cycles until cancelled.
    pub async fn run(mut self) {
        info!(symbol = %self.config.symbol, "Starting trading loop");

        loop {
            let wait = self.next_interval();
            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                () = self.shutdown.cancelled() => {
                    info!("Trading loop shut down");
                    return;
                }
            }
            self.tick().await;
        }
    }

    fn next_interval(&self) -> Duration {
        let (lo, hi) = (self.config.min_interval, self.config.max_interval);
        if hi <= lo {
            return lo;
        }
        rand::thread_rng().gen_range(lo..=hi)
    }

    /// One decision cycle.
    async fn tick(&mut self) {
        let Some(quote) = self.board.latest() else {
            warn!("No market data yet, skipping cycle");
            return;
        };

        let intent = self.decide.decide(&quote, &self.filters);
        let price = self.filters.normalize_price(intent.price);
        let qty = self.filters.normalize_qty(intent.qty);

        info!(
            symbol = %self.config.symbol,
            side = %intent.side,
            %qty,
            %price,
            "Placing order"
        );

        match self
            .gateway
            .place_order(&self.config.symbol, intent.side, qty, price)
            .await
        {
            Ok(ack) => {
                info!(order_id = ?ack.order_id, status = ?ack.status, "Order placed");
                self.orders_since_cleanup += 1;
            }
            Err(e) => {
                error!(error = %e, "Order submission failed");
                return;
            }
        }

        if self.orders_since_cleanup >= self.config.cleanup_every {
            info!(
                placed = self.orders_since_cleanup,
                "Cleanup threshold reached, cancelling all open orders"
            );
            if let Err(e) = self.gateway.cancel_all_open_orders(&self.config.symbol).await {
                error!(error = %e, "Cancel-all failed");
            }
            self.orders_since_cleanup = 0;
        }
    }
}
