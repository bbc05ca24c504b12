pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::{Config, TokenRegistry};
pub use datasource::{
    EventSource, MockEventSource, MockPriceOracle, MockValuator, PriceOracle, RawEvent,
    SourceError, ThorClient, TransactionValuator,
};
pub use domain::{Address, BlockNumber, Decimal, PoolEvent, TxHash};
pub use engine::{AccountingEngine, DisplayMetrics, PoolState, RoiCalculator};
pub use error::AppError;
