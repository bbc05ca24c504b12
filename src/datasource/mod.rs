//! Upstream collaborators: event logs, transaction values, spot prices.

use crate::domain::{Address, BlockNumber, Decimal, TxHash};
use async_trait::async_trait;
use std::fmt;

pub mod coingecko;
pub mod decode;
pub mod mock;
pub mod thor;

pub use coingecko::CoinGeckoOracle;
pub use decode::{decode_event, DecodeError};
pub use mock::{MockEventSource, MockPriceOracle, MockValuator};
pub use thor::ThorClient;

/// One undecoded log entry as returned by the node.
///
/// `topics[0]` is the event discriminator; the rest are indexed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub topics: Vec<String>,
    pub data: String,
    pub tx_hash: TxHash,
    pub block_number: BlockNumber,
}

/// Ordered event-log access for an exchange contract.
///
/// Implementations must return events in chronological order (ascending
/// block, then log position within block) and handle pagination, retry and
/// backoff internally.
#[async_trait]
pub trait EventSource: Send + Sync + fmt::Debug {
    /// Current head block height.
    async fn head_block(&self) -> Result<BlockNumber, SourceError>;

    /// All pool events for `exchange` in `[from_block, to_block]`.
    async fn fetch_events(
        &self,
        exchange: &Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<RawEvent>, SourceError>;
}

/// Current USD spot price lookup.
#[async_trait]
pub trait PriceOracle: Send + Sync + fmt::Debug {
    /// Price for a pricing-service identifier (e.g. "vechain"), in USD.
    async fn usd_price(&self, price_id: &str) -> Result<Decimal, SourceError>;
}

/// Total monetary value moved by a transaction, in raw on-chain units.
#[async_trait]
pub trait TransactionValuator: Send + Sync + fmt::Debug {
    async fn transaction_value(&self, tx_hash: &TxHash) -> Result<Decimal, SourceError>;
}

/// Error type for upstream operations.
#[derive(Debug, Clone)]
pub enum SourceError {
    /// Connection failure or timeout.
    NetworkError(String),
    /// Non-success HTTP status from the upstream.
    HttpError { status: u16, message: String },
    /// Response body did not match the expected shape.
    ParseError(String),
    /// Rate limit exceeded after retries.
    RateLimited,
    /// Other error.
    Other(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            SourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            SourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            SourceError::RateLimited => write!(f, "Rate limited"),
            SourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}
