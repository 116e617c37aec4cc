//! Signed request execution against the exchange REST surface.
//!
//! One reusable HTTP client, lazily pooling connections. Signed calls get
//! a millisecond timestamp parameter, the query string is serialized in
//! insertion order, signed, and the signature appended as the trailing
//! parameter — the signed bytes are exactly the bytes transmitted. The
//! API key travels in a header, never as a parameter.

use crate::error::{RestError, RestResult};
use crate::signer::{encode_query, sign};
use crate::types::{ExchangeInfo, OrderAck};
use reqwest::{Client, Method};
use std::time::Duration;
use tickflow_core::{OrderType, Price, Qty, Side, TimeInForce};
use tracing::{debug, error};

/// Header carrying the API key on every request.
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Default timeout for REST calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// API credentials, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Load credentials from `BINANCE_API_KEY` / `BINANCE_API_SECRET`.
    pub fn from_env() -> RestResult<Self> {
        let api_key = std::env::var("BINANCE_API_KEY")
            .map_err(|_| RestError::MissingCredentials("BINANCE_API_KEY".to_string()))?;
        let api_secret = std::env::var("BINANCE_API_SECRET")
            .map_err(|_| RestError::MissingCredentials("BINANCE_API_SECRET".to_string()))?;
        Ok(Self::new(api_key, api_secret))
    }

    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// REST client owning the credentials and the reusable connection pool.
#[derive(Debug)]
pub struct RestClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> RestResult<Self> {
        if !credentials.is_valid() {
            return Err(RestError::InvalidConfig("empty API credentials".to_string()));
        }
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(RestError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Execute one REST call and parse the JSON body.
    ///
    /// `params` keeps insertion order; `None` values are dropped before
    /// serialization. Status >= 400 surfaces as `RestError::Remote` with
    /// the raw body.
    async fn call(
        &self,
        method: Method,
        path: &str,
        params: Vec<(&'static str, Option<String>)>,
        signed: bool,
    ) -> RestResult<serde_json::Value> {
        let params: Vec<(&str, String)> = params
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();

        let query = if signed {
            build_signed_query(
                &params,
                chrono::Utc::now().timestamp_millis(),
                &self.credentials.api_secret,
            )
        } else {
            encode_query(&params)
        };

        let url = if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        };

        debug!(%method, path, signed, "Sending REST request");

        let response = self
            .http
            .request(method, &url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if status >= 400 {
            error!(status, body = %body, "Remote API error");
            return Err(RestError::Remote { status, body });
        }

        serde_json::from_str(&body)
            .map_err(|e| RestError::Protocol(format!("unparseable response body: {e}")))
    }

    /// Fetch exchange metadata (filters, limits). Unsigned.
    pub async fn fetch_exchange_info(&self) -> RestResult<ExchangeInfo> {
        let body = self
            .call(Method::GET, "/fapi/v1/exchangeInfo", Vec::new(), false)
            .await?;
        serde_json::from_value(body)
            .map_err(|e| RestError::Protocol(format!("unexpected exchangeInfo shape: {e}")))
    }

    /// Place a new order. Signed.
    pub async fn place_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Qty,
        price: Price,
        order_type: OrderType,
        time_in_force: TimeInForce,
    ) -> RestResult<OrderAck> {
        let params = vec![
            ("symbol", Some(symbol.to_string())),
            ("side", Some(side.as_str().to_string())),
            ("type", Some(order_type.as_str().to_string())),
            ("quantity", Some(quantity.to_string())),
            ("price", Some(price.to_string())),
            ("timeInForce", Some(time_in_force.as_str().to_string())),
        ];
        let body = self.call(Method::POST, "/fapi/v1/order", params, true).await?;
        serde_json::from_value(body)
            .map_err(|e| RestError::Protocol(format!("unexpected order ack shape: {e}")))
    }

    /// Cancel every open order for a symbol. Signed.
    pub async fn cancel_all_open_orders(&self, symbol: &str) -> RestResult<serde_json::Value> {
        let params = vec![("symbol", Some(symbol.to_string()))];
        self.call(Method::DELETE, "/fapi/v1/allOpenOrders", params, true)
            .await
    }
}

/// Append the timestamp, sign the literal query string, and append the
/// signature as the trailing parameter.
fn build_signed_query(params: &[(&str, String)], timestamp_ms: i64, secret: &str) -> String {
    let mut query = encode_query(params);
    if !query.is_empty() {
        query.push('&');
    }
    query.push_str("timestamp=");
    query.push_str(&timestamp_ms.to_string());

    let signature = sign(secret, &query);
    query.push_str("&signature=");
    query.push_str(&signature);
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

    fn reference_params() -> Vec<(&'static str, String)> {
        vec![
            ("symbol", "LTCBTC".to_string()),
            ("side", "BUY".to_string()),
            ("type", "LIMIT".to_string()),
            ("timeInForce", "GTC".to_string()),
            ("quantity", "1".to_string()),
            ("price", "0.1".to_string()),
            ("recvWindow", "5000".to_string()),
        ]
    }

    #[test]
    fn test_signed_query_matches_reference_vector() {
        let query = build_signed_query(&reference_params(), 1_499_827_319_559, SECRET);
        assert_eq!(
            query,
            "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1\
             &recvWindow=5000&timestamp=1499827319559\
             &signature=c8db56825ae71d6d79447849e617115f4a920fa2acdc98b0693acfa8b29257e9"
        );
    }

    #[test]
    fn test_signature_covers_literal_bytes() {
        let query = build_signed_query(&reference_params(), 1_499_827_319_559, SECRET);
        let (payload, signature) = query.rsplit_once("&signature=").unwrap();
        assert_eq!(sign(SECRET, payload), signature);
    }

    #[test]
    fn test_signed_query_with_no_params_still_signs_timestamp() {
        let query = build_signed_query(&[], 1_700_000_000_000, SECRET);
        assert!(query.starts_with("timestamp=1700000000000&signature="));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let err = RestClient::new("https://example.com", Credentials::new("", "")).unwrap_err();
        assert!(matches!(err, RestError::InvalidConfig(_)));
    }
}
