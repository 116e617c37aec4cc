//! Main application orchestration.
//!
//! Fetches symbol filters once at startup, then runs the quote
//! subscriber and the trading loop as independent tasks sharing only
//! the quote board, until an external stop signal arrives.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;
use tickflow_core::{QuoteBoard, SymbolFilters};
use tickflow_rest::{Credentials, RestClient};
use tickflow_strategy::{RandomFlow, RandomFlowConfig, TradeLoop, TradeLoopConfig};
use tickflow_ws::{BookTickerSubscriber, SubscriberConfig};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    credentials: Credentials,
}

impl Application {
    pub fn new(config: AppConfig, credentials: Credentials) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            credentials,
        })
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> AppResult<()> {
        let client = Arc::new(RestClient::new(
            &self.config.rest_url,
            self.credentials.clone(),
        )?);

        let filters = Self::resolve_filters(&client, &self.config.symbol).await;
        info!(
            symbol = %filters.symbol,
            tick_size = %filters.tick_size,
            step_size = %filters.step_size,
            min_qty = %filters.min_qty,
            "Symbol filters resolved"
        );

        let board = Arc::new(QuoteBoard::new());
        let shutdown = CancellationToken::new();

        let subscriber = Arc::new(BookTickerSubscriber::new(
            SubscriberConfig::new(&self.config.ws_url, &self.config.symbol)
                .with_reconnect_delay(Duration::from_millis(self.config.stream.reconnect_delay_ms)),
            board.clone(),
            shutdown.clone(),
        ));
        let subscriber_task = {
            let subscriber = subscriber.clone();
            tokio::spawn(async move { subscriber.run().await })
        };

        let decide = RandomFlow::new(RandomFlowConfig {
            target_notional: self.config.trading.target_notional,
            price_offset_pct: self.config.trading.price_offset_pct,
        });
        let mut loop_config = TradeLoopConfig::new(&self.config.symbol);
        loop_config.min_interval = self.config.trading.min_interval();
        loop_config.max_interval = self.config.trading.max_interval();
        loop_config.cleanup_every = self.config.trading.cleanup_every;

        let trade_loop = TradeLoop::new(
            loop_config,
            decide,
            client.clone(),
            board,
            filters,
            shutdown.clone(),
        );
        let trading_task = tokio::spawn(trade_loop.run());

        tokio::signal::ctrl_c()
            .await
            .map_err(|e| AppError::Signal(e.to_string()))?;
        info!("Stop signal received, shutting down");
        shutdown.cancel();

        if let Err(e) = trading_task.await {
            error!(error = %e, "Trading task ended abnormally");
        }
        match subscriber_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Subscriber ended with error"),
            Err(e) => error!(error = %e, "Subscriber task ended abnormally"),
        }

        info!("Shutdown complete");
        Ok(())
    }

    /// Fetch filters from exchange metadata, falling back to
    /// conservative defaults when the fetch fails or the metadata is
    /// unusable. Metadata problems are not fatal.
    async fn resolve_filters(client: &RestClient, symbol: &str) -> SymbolFilters {
        match client.fetch_exchange_info().await {
            Ok(info) => match info.symbol_filters(symbol) {
                Some(filters) if filters.validate().is_ok() => filters,
                Some(filters) => {
                    warn!(
                        symbol,
                        tick_size = %filters.tick_size,
                        step_size = %filters.step_size,
                        "Exchange reported invalid filters, using conservative defaults"
                    );
                    SymbolFilters::conservative(symbol)
                }
                None => {
                    warn!(symbol, "Symbol missing from exchange info, using conservative defaults");
                    SymbolFilters::conservative(symbol)
                }
            },
            Err(e) => {
                error!(error = %e, "Failed to fetch exchange info, using conservative defaults");
                SymbolFilters::conservative(symbol)
            }
        }
    }
}
