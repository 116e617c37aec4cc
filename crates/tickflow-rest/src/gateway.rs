//! Narrow order-dispatch seam for the trading loop.
//!
//! The loop only ever places limit orders and fires cancel-alls, so the
//! trait exposes just that. Keeping it behind a trait lets the loop be
//! driven against a mock gateway in tests.

use crate::error::RestResult;
use crate::types::OrderAck;
use crate::RestClient;
use async_trait::async_trait;
use tickflow_core::{OrderType, Price, Qty, Side, TimeInForce};

#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Place a GTC limit order.
    async fn place_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Qty,
        price: Price,
    ) -> RestResult<OrderAck>;

    /// Cancel every open order for the symbol.
    async fn cancel_all_open_orders(&self, symbol: &str) -> RestResult<serde_json::Value>;
}

#[async_trait]
impl OrderGateway for RestClient {
    async fn place_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Qty,
        price: Price,
    ) -> RestResult<OrderAck> {
        RestClient::place_order(
            self,
            symbol,
            side,
            quantity,
            price,
            OrderType::Limit,
            TimeInForce::Gtc,
        )
        .await
    }

    async fn cancel_all_open_orders(&self, symbol: &str) -> RestResult<serde_json::Value> {
        RestClient::cancel_all_open_orders(self, symbol).await
    }
}
