//! Domain types for pool-position reconstruction.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: Address, TxHash, BlockNumber
//! - The closed PoolEvent enum over the five exchange-contract events

pub mod decimal;
pub mod event;
pub mod primitives;

pub use decimal::Decimal;
pub use event::PoolEvent;
pub use primitives::{Address, AddressParseError, BlockNumber, TxHash};
