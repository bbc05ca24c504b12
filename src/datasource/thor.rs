//! VeChain Thor node client: event-log range queries and transaction values.

use super::decode::ALL_TOPICS;
use super::{EventSource, RawEvent, SourceError, TransactionValuator};
use crate::domain::{Address, BlockNumber, Decimal, TxHash};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Thor's hard response cap per logs query.
const LOGS_PAGE_LIMIT: usize = 1000;

/// Thor REST client implementing both [`EventSource`] and
/// [`TransactionValuator`].
#[derive(Debug, Clone)]
pub struct ThorClient {
    client: Client,
    base_url: String,
}

impl ThorClient {
    pub fn new(base_url: String, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_default();
        Self { client, base_url }
    }

    fn backoff() -> ExponentialBackoff {
        ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        }
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        retry(Self::backoff(), || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                warn!("thor GET {} failed transiently: {}", url, e);
                backoff::Error::transient(SourceError::NetworkError(e.to_string()))
            })?;
            classify_and_parse(response).await
        })
        .await
    }

    async fn post_json(
        &self,
        path: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        retry(Self::backoff(), || async {
            let response = self
                .client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    warn!("thor POST {} failed transiently: {}", url, e);
                    backoff::Error::transient(SourceError::NetworkError(e.to_string()))
                })?;
            classify_and_parse(response).await
        })
        .await
    }

    /// One page of the logs query, `offset` into the full ordered result.
    async fn fetch_events_page(
        &self,
        exchange: &Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
        offset: usize,
    ) -> Result<Vec<RawEvent>, SourceError> {
        let criteria: Vec<serde_json::Value> = ALL_TOPICS
            .iter()
            .map(|topic| {
                serde_json::json!({
                    "address": exchange.as_str(),
                    "topic0": topic,
                })
            })
            .collect();

        let payload = serde_json::json!({
            "range": { "unit": "block", "from": from_block, "to": to_block },
            "options": { "offset": offset, "limit": LOGS_PAGE_LIMIT },
            "criteriaSet": criteria,
            "order": "asc",
        });

        let response = self.post_json("/logs/event", payload).await?;
        let entries = response
            .as_array()
            .ok_or_else(|| SourceError::ParseError("Expected array response".to_string()))?;

        entries.iter().map(parse_raw_event).collect()
    }
}

async fn classify_and_parse(
    response: reqwest::Response,
) -> Result<serde_json::Value, backoff::Error<SourceError>> {
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
}

fn parse_raw_event(entry: &serde_json::Value) -> Result<RawEvent, SourceError> {
    let topics = entry
        .get("topics")
        .and_then(|v| v.as_array())
        .ok_or_else(|| SourceError::ParseError("Missing topics field".to_string()))?
        .iter()
        .map(|t| {
            t.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| SourceError::ParseError("Non-string topic".to_string()))
        })
        .collect::<Result<Vec<String>, SourceError>>()?;

    let data = entry
        .get("data")
        .and_then(|v| v.as_str())
        .ok_or_else(|| SourceError::ParseError("Missing data field".to_string()))?
        .to_string();

    let meta = entry
        .get("meta")
        .ok_or_else(|| SourceError::ParseError("Missing meta field".to_string()))?;

    let tx_hash = meta
        .get("txID")
        .and_then(|v| v.as_str())
        .ok_or_else(|| SourceError::ParseError("Missing meta.txID field".to_string()))?
        .to_string();

    let block_number = meta
        .get("blockNumber")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| SourceError::ParseError("Missing meta.blockNumber field".to_string()))?;

    Ok(RawEvent {
        topics,
        data,
        tx_hash: TxHash::new(tx_hash),
        block_number,
    })
}

#[async_trait]
impl EventSource for ThorClient {
    async fn head_block(&self) -> Result<BlockNumber, SourceError> {
        let response = self.get_json("/blocks/best").await?;
        response
            .get("number")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| SourceError::ParseError("Missing block number field".to_string()))
    }

    async fn fetch_events(
        &self,
        exchange: &Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<RawEvent>, SourceError> {
        debug!(
            "Fetching events for exchange={}, blocks [{}, {}]",
            exchange, from_block, to_block
        );

        // The node caps each response; page until a short page. Ascending
        // order is preserved across pages.
        let mut events = Vec::new();
        loop {
            let page = self
                .fetch_events_page(exchange, from_block, to_block, events.len())
                .await?;
            let page_len = page.len();
            events.extend(page);
            if page_len < LOGS_PAGE_LIMIT {
                break;
            }
        }

        debug!("Fetched {} events for exchange={}", events.len(), exchange);
        Ok(events)
    }
}

#[async_trait]
impl TransactionValuator for ThorClient {
    async fn transaction_value(&self, tx_hash: &TxHash) -> Result<Decimal, SourceError> {
        debug!("Fetching transaction value for {}", tx_hash);

        let response = self
            .get_json(&format!("/transactions/{}", tx_hash.as_str()))
            .await?;

        let clauses = response
            .get("clauses")
            .and_then(|v| v.as_array())
            .ok_or_else(|| SourceError::ParseError("Missing clauses field".to_string()))?;

        let mut total = Decimal::zero();
        for clause in clauses {
            let value_hex = clause
                .get("value")
                .and_then(|v| v.as_str())
                .ok_or_else(|| SourceError::ParseError("Missing clause value".to_string()))?;
            total = total + parse_hex_value(value_hex)?;
        }
        Ok(total)
    }
}

fn parse_hex_value(value: &str) -> Result<Decimal, SourceError> {
    let hex_part = value.strip_prefix("0x").unwrap_or(value);
    let raw = u128::from_str_radix(hex_part, 16)
        .map_err(|_| SourceError::ParseError(format!("Invalid clause value: {}", value)))?;
    Decimal::from_raw_amount(raw)
        .map_err(|_| SourceError::ParseError(format!("Clause value out of range: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_event_valid() {
        let entry = serde_json::json!({
            "topics": ["0xaa", "0xbb"],
            "data": "0x",
            "meta": { "txID": "0xdeadbeef", "blockNumber": 1800000 }
        });

        let raw = parse_raw_event(&entry).unwrap();
        assert_eq!(raw.topics, vec!["0xaa".to_string(), "0xbb".to_string()]);
        assert_eq!(raw.tx_hash, TxHash::new("0xdeadbeef".to_string()));
        assert_eq!(raw.block_number, 1800000);
    }

    #[test]
    fn test_parse_raw_event_missing_meta() {
        let entry = serde_json::json!({
            "topics": ["0xaa"],
            "data": "0x"
        });
        assert!(parse_raw_event(&entry).is_err());
    }

    #[test]
    fn test_parse_hex_value() {
        let value = parse_hex_value("0xde0b6b3a7640000").unwrap(); // 1e18
        assert_eq!(value, Decimal::from_raw_amount(1_000_000_000_000_000_000).unwrap());
        assert!(parse_hex_value("0xnope").is_err());
    }
}
