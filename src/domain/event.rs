//! Decoded pool events.
//!
//! The five Vexchange exchange-contract events, as a closed enum so the
//! accounting fold is exhaustively matched by the compiler. Amounts are raw
//! on-chain integers (wei-scale); the engine applies display scaling.

use super::{Address, Decimal, TxHash};

/// One decoded log entry from the exchange contract.
///
/// Events carry their originating transaction hash; chronological position is
/// implicit in the order of the containing sequence and must be preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolEvent {
    /// Reserves grew: `provider` deposited VET and tokens.
    AddLiquidity {
        provider: Address,
        eth_amount: Decimal,
        token_amount: Decimal,
        tx_hash: TxHash,
    },
    /// Reserves shrank: `provider` withdrew VET and tokens.
    RemoveLiquidity {
        provider: Address,
        eth_amount: Decimal,
        token_amount: Decimal,
        tx_hash: TxHash,
    },
    /// Share-token movement. Mint when `from` is the zero address, burn when
    /// `to` is; transfers between two live accounts don't change supply.
    Transfer {
        from: Address,
        to: Address,
        value: Decimal,
        tx_hash: TxHash,
    },
    /// Swap paying VET out of the pool for tokens in.
    EthPurchase {
        buyer: Address,
        tokens_sold: Decimal,
        eth_bought: Decimal,
        tx_hash: TxHash,
    },
    /// Swap paying tokens out of the pool for VET in.
    TokenPurchase {
        buyer: Address,
        eth_sold: Decimal,
        tokens_bought: Decimal,
        tx_hash: TxHash,
    },
}

impl PoolEvent {
    pub fn tx_hash(&self) -> &TxHash {
        match self {
            PoolEvent::AddLiquidity { tx_hash, .. }
            | PoolEvent::RemoveLiquidity { tx_hash, .. }
            | PoolEvent::Transfer { tx_hash, .. }
            | PoolEvent::EthPurchase { tx_hash, .. }
            | PoolEvent::TokenPurchase { tx_hash, .. } => tx_hash,
        }
    }

    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PoolEvent::AddLiquidity { .. } => "AddLiquidity",
            PoolEvent::RemoveLiquidity { .. } => "RemoveLiquidity",
            PoolEvent::Transfer { .. } => "Transfer",
            PoolEvent::EthPurchase { .. } => "EthPurchase",
            PoolEvent::TokenPurchase { .. } => "TokenPurchase",
        }
    }
}
