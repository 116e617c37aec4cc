//! Request signing.
//!
//! The exchange authenticates signed endpoints with a hex-encoded
//! HMAC-SHA256 over the exact query string transmitted. Parameter order
//! matters: the signature covers the bytes as sent, so the query must be
//! built in insertion order and never re-encoded afterwards.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign a query-string payload with the API secret.
///
/// Pure and deterministic; no I/O.
pub fn sign(secret: &str, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Build a query string from ordered key/value pairs.
///
/// Keys are emitted in the order given; values are percent-encoded.
pub fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
