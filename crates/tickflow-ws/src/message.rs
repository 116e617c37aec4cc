//! Book-ticker frame parsing.
//!
//! Inbound frames are JSON objects with string-encoded decimals: `b` is
//! the best bid, `a` the best ask. Other fields (update id, symbol,
//! sizes) are ignored.

use crate::error::{WsError, WsResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use tickflow_core::{Price, Quote};

/// Raw book-ticker frame.
#[derive(Debug, Deserialize)]
struct BookTickerFrame {
    /// Best bid price.
    b: String,
    /// Best ask price.
    a: String,
}

/// Parse one text frame into a quote.
pub fn parse_book_ticker(text: &str) -> WsResult<Quote> {
    let frame: BookTickerFrame = serde_json::from_str(text)
        .map_err(|e| WsError::MalformedMessage(format!("{e}: {text}")))?;

    let bid: Decimal = frame
        .b
        .parse()
        .map_err(|_| WsError::MalformedMessage(format!("invalid bid: {}", frame.b)))?;
    let ask: Decimal = frame
        .a
        .parse()
        .map_err(|_| WsError::MalformedMessage(format!("invalid ask: {}", frame.a)))?;

    Ok(Quote::new(Price::new(bid), Price::new(ask)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_full_frame() {
        let text = r#"{"u":400900217,"s":"SOLUSDT","b":"25.35190000","B":"31.21000000","a":"25.36520000","A":"40.66000000"}"#;
        let quote = parse_book_ticker(text).unwrap();
        assert_eq!(quote.bid.inner(), dec!(25.35190000));
        assert_eq!(quote.ask.inner(), dec!(25.36520000));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = parse_book_ticker(r#"{"b":"25.35"}"#).unwrap_err();
        assert!(matches!(err, WsError::MalformedMessage(_)));
    }

    #[test]
    fn test_non_numeric_price_is_malformed() {
        let err = parse_book_ticker(r#"{"b":"25.35","a":"oops"}"#).unwrap_err();
        assert!(matches!(err, WsError::MalformedMessage(_)));
    }

    #[test]
    fn test_non_json_is_malformed() {
        assert!(parse_book_ticker("not json").is_err());
    }
}
