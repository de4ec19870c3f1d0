//! Checkout proxy
//!
//! `POST {"amountUSD": n}` is snapped to the nearest authorized price tier
//! and forwarded to the pool server's `/buy-now`. The pool's JSON is passed
//! back untouched when it carries an `exchangeUrl`.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use lander_common::nearest_tier;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::WebError;

#[derive(Debug, Clone)]
pub struct PoolClient {
    base_url: String,
    http: reqwest::Client,
}

impl PoolClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request an exchange for `tier` dollars
    pub async fn buy_now(&self, tier: u32) -> Result<Value, WebError> {
        let data: Value = self
            .http
            .post(format!("{}/buy-now", self.base_url))
            .json(&json!({ "amountUSD": tier }))
            .send()
            .await?
            .json()
            .await?;

        if has_exchange_url(&data) {
            Ok(data)
        } else {
            Err(WebError::NoExchangeUrl)
        }
    }
}

fn has_exchange_url(data: &Value) -> bool {
    match data.get("exchangeUrl") {
        Some(Value::String(url)) => !url.is_empty(),
        Some(Value::Null) | Some(Value::Bool(false)) | None => false,
        Some(_) => true,
    }
}

#[derive(Debug, Deserialize)]
struct BuyNowRequest {
    #[serde(rename = "amountUSD", default)]
    amount_usd: Option<Amount>,
}

/// Browsers post the amount either as a number or as the input's string value
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Amount {
    fn value(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => Some(*n),
            Amount::Text(s) => s.trim().parse().ok(),
            Amount::Other(_) => None,
        }
    }
}

/// Requested amount from a request body. Numeric strings are accepted;
/// anything that is not a positive finite number counts as missing.
pub fn requested_amount(body: &[u8]) -> Result<f64, WebError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(WebError::MissingAmount);
    }
    let request: BuyNowRequest = serde_json::from_slice(body).map_err(|_| WebError::MissingAmount)?;
    request
        .amount_usd
        .as_ref()
        .and_then(Amount::value)
        .filter(|amount| amount.is_finite() && *amount > 0.0)
        .ok_or(WebError::MissingAmount)
}

pub async fn buy_now_handler(State(pool): State<PoolClient>, method: Method, body: Bytes) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::POST {
        return WebError::MethodNotAllowed.into_response();
    }

    match buy_now(&pool, &body).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            if e.status().is_server_error() {
                error!("[buy-now] {}", e);
            }
            e.into_response()
        }
    }
}

async fn buy_now(pool: &PoolClient, body: &[u8]) -> Result<Value, WebError> {
    let amount = requested_amount(body)?;
    let tier = nearest_tier(amount).map_err(|_| WebError::MissingAmount)?;
    info!("[buy-now] Mapping ${} -> tier ${}", amount, tier);
    pool.buy_now(tier).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_amount() {
        assert_eq!(requested_amount(br#"{"amountUSD": 44}"#).unwrap(), 44.0);
        assert_eq!(requested_amount(br#"{"amountUSD": 24.5}"#).unwrap(), 24.5);
        assert!(matches!(requested_amount(b""), Err(WebError::MissingAmount)));
        assert!(matches!(requested_amount(b"{}"), Err(WebError::MissingAmount)));
        assert!(matches!(requested_amount(br#"{"amountUSD": 0}"#), Err(WebError::MissingAmount)));
        assert!(matches!(requested_amount(br#"{"amountUSD": -5}"#), Err(WebError::MissingAmount)));
        assert!(matches!(requested_amount(b"not json"), Err(WebError::MissingAmount)));
    }

    #[test]
    fn test_requested_amount_accepts_numeric_strings() {
        assert_eq!(requested_amount(br#"{"amountUSD": "29"}"#).unwrap(), 29.0);
        assert_eq!(requested_amount(br#"{"amountUSD": " 44.5 "}"#).unwrap(), 44.5);
        assert!(matches!(requested_amount(br#"{"amountUSD": "abc"}"#), Err(WebError::MissingAmount)));
        assert!(matches!(requested_amount(br#"{"amountUSD": ""}"#), Err(WebError::MissingAmount)));
        assert!(matches!(requested_amount(br#"{"amountUSD": true}"#), Err(WebError::MissingAmount)));
        assert!(matches!(requested_amount(br#"{"amountUSD": null}"#), Err(WebError::MissingAmount)));
    }

    #[test]
    fn test_exchange_url_detection() {
        assert!(has_exchange_url(&json!({ "exchangeUrl": "https://swap.example/x" })));
        assert!(!has_exchange_url(&json!({ "exchangeUrl": "" })));
        assert!(!has_exchange_url(&json!({ "exchangeUrl": null })));
        assert!(!has_exchange_url(&json!({ "error": "pool empty" })));
    }

    #[test]
    fn test_pool_base_url_trimmed() {
        assert_eq!(PoolClient::new("http://pool.local/").base_url(), "http://pool.local");
    }
}
