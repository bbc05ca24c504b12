//! Mock datasources for testing without network calls.
//!
//! The mocks count their calls so tests can assert that rejected requests
//! never reach an upstream.

use super::decode::{
    ADD_LIQUIDITY_TOPIC, ETH_PURCHASE_TOPIC, REMOVE_LIQUIDITY_TOPIC, TOKEN_PURCHASE_TOPIC,
    TRANSFER_TOPIC,
};
use super::{EventSource, PriceOracle, RawEvent, SourceError, TransactionValuator};
use crate::domain::{Address, BlockNumber, Decimal, TxHash};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock event source returning a predefined raw event sequence.
#[derive(Debug, Clone, Default)]
pub struct MockEventSource {
    events: Vec<RawEvent>,
    head: BlockNumber,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockEventSource {
    pub fn new() -> Self {
        Self {
            head: 2_000_000,
            ..Default::default()
        }
    }

    pub fn with_events(mut self, events: Vec<RawEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn head_block(&self) -> Result<BlockNumber, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::NetworkError("mock head failure".to_string()));
        }
        Ok(self.head)
    }

    async fn fetch_events(
        &self,
        _exchange: &Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<RawEvent>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::NetworkError("mock fetch failure".to_string()));
        }
        Ok(self
            .events
            .iter()
            .filter(|e| e.block_number >= from_block && e.block_number <= to_block)
            .cloned()
            .collect())
    }
}

/// Mock price oracle returning a fixed USD price.
#[derive(Debug, Clone)]
pub struct MockPriceOracle {
    price: Decimal,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockPriceOracle {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceOracle for MockPriceOracle {
    async fn usd_price(&self, _price_id: &str) -> Result<Decimal, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::NetworkError("mock price failure".to_string()));
        }
        Ok(self.price)
    }
}

/// Mock transaction valuator returning a fixed raw value per call.
#[derive(Debug, Clone)]
pub struct MockValuator {
    value: Decimal,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockValuator {
    pub fn new(value: Decimal) -> Self {
        Self {
            value,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionValuator for MockValuator {
    async fn transaction_value(&self, _tx_hash: &TxHash) -> Result<Decimal, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::NetworkError(
                "mock valuation failure".to_string(),
            ));
        }
        Ok(self.value)
    }
}

// Raw-event builders so endpoint tests exercise the real decoder.

fn amount_word(v: u128) -> String {
    format!("0x{:064x}", v)
}

fn address_word(addr: &Address) -> String {
    format!("0x{:0>64}", addr.as_str().trim_start_matches("0x"))
}

fn raw(topics: Vec<String>, data: String, block: BlockNumber, tx: &str) -> RawEvent {
    RawEvent {
        topics,
        data,
        tx_hash: TxHash::new(tx.to_string()),
        block_number: block,
    }
}

pub fn raw_add_liquidity(
    provider: &Address,
    eth_amount: u128,
    token_amount: u128,
    block: BlockNumber,
    tx: &str,
) -> RawEvent {
    raw(
        vec![
            ADD_LIQUIDITY_TOPIC.to_string(),
            address_word(provider),
            amount_word(eth_amount),
            amount_word(token_amount),
        ],
        "0x".to_string(),
        block,
        tx,
    )
}

pub fn raw_remove_liquidity(
    provider: &Address,
    eth_amount: u128,
    token_amount: u128,
    block: BlockNumber,
    tx: &str,
) -> RawEvent {
    raw(
        vec![
            REMOVE_LIQUIDITY_TOPIC.to_string(),
            address_word(provider),
            amount_word(eth_amount),
            amount_word(token_amount),
        ],
        "0x".to_string(),
        block,
        tx,
    )
}

pub fn raw_transfer(
    from: &Address,
    to: &Address,
    value: u128,
    block: BlockNumber,
    tx: &str,
) -> RawEvent {
    raw(
        vec![
            TRANSFER_TOPIC.to_string(),
            address_word(from),
            address_word(to),
        ],
        amount_word(value),
        block,
        tx,
    )
}

pub fn raw_eth_purchase(
    buyer: &Address,
    tokens_sold: u128,
    eth_bought: u128,
    block: BlockNumber,
    tx: &str,
) -> RawEvent {
    raw(
        vec![
            ETH_PURCHASE_TOPIC.to_string(),
            address_word(buyer),
            amount_word(tokens_sold),
            amount_word(eth_bought),
        ],
        "0x".to_string(),
        block,
        tx,
    )
}

pub fn raw_token_purchase(
    buyer: &Address,
    eth_sold: u128,
    tokens_bought: u128,
    block: BlockNumber,
    tx: &str,
) -> RawEvent {
    raw(
        vec![
            TOKEN_PURCHASE_TOPIC.to_string(),
            address_word(buyer),
            amount_word(eth_sold),
            amount_word(tokens_bought),
        ],
        "0x".to_string(),
        block,
        tx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::decode_event;
    use crate::domain::PoolEvent;

    fn provider() -> Address {
        Address::parse("0x89827f7bb951fd8a56f8ef13c5bfee38522f2e1f").unwrap()
    }

    #[tokio::test]
    async fn test_mock_event_source_filters_by_range() {
        let source = MockEventSource::new().with_events(vec![
            raw_transfer(&Address::zero(), &provider(), 10, 1_800_000, "0x01"),
            raw_transfer(&Address::zero(), &provider(), 20, 1_900_000, "0x02"),
        ]);

        let events = source
            .fetch_events(&provider(), 1_850_000, 2_000_000)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_valuator_counts_calls() {
        let valuator = MockValuator::new(Decimal::from_str_canonical("42").unwrap());
        valuator
            .transaction_value(&TxHash::new("0x01".to_string()))
            .await
            .unwrap();
        assert_eq!(valuator.call_count(), 1);
    }

    #[test]
    fn test_builders_decode_cleanly() {
        let raw = raw_add_liquidity(&provider(), 100, 50, 1_800_000, "0xaa");
        let event = decode_event(&raw).unwrap();
        assert!(matches!(event, PoolEvent::AddLiquidity { .. }));
    }
}
