//! CoinGecko spot-price oracle.

use super::{PriceOracle, SourceError};
use crate::domain::Decimal;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// USD price lookup via the CoinGecko tickers endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoOracle {
    client: Client,
    base_url: String,
}

impl CoinGeckoOracle {
    pub fn new(base_url: String, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_default();
        Self { client, base_url }
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn usd_price(&self, price_id: &str) -> Result<Decimal, SourceError> {
        debug!("Fetching USD price for {}", price_id);

        let url = format!("{}/api/v3/coins/{}/tickers", self.base_url, price_id);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        let response = retry(backoff, || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(SourceError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(SourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(SourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(SourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(SourceError::ParseError(e.to_string())))
        })
        .await?;

        extract_usd_last(&response)
    }
}

/// First ticker quoted against USD; its `last` price.
fn extract_usd_last(response: &serde_json::Value) -> Result<Decimal, SourceError> {
    let tickers = response
        .get("tickers")
        .and_then(|v| v.as_array())
        .ok_or_else(|| SourceError::ParseError("Missing tickers field".to_string()))?;

    let usd_ticker = tickers
        .iter()
        .find(|t| t.get("target").and_then(|v| v.as_str()) == Some("USD"))
        .ok_or_else(|| SourceError::ParseError("No USD ticker in response".to_string()))?;

    let last = usd_ticker
        .get("last")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| SourceError::ParseError("Missing last price".to_string()))?;

    rust_decimal::Decimal::try_from(last)
        .map(Decimal::new)
        .map_err(|e| SourceError::ParseError(format!("Invalid last price: {}", e)))
}
