//! Running pool/position state threaded through the event fold.

use crate::domain::Decimal;

/// Cost basis of the tracked address's historical contributions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DepositBasis {
    /// Whether a deposit has been recorded for the tracked address.
    pub has_deposit: bool,
    /// Net VET contributed, display units.
    pub vet: Decimal,
    /// Net tokens contributed, display units.
    pub tokens: Decimal,
    /// Accumulated transaction value across qualifying liquidity events.
    pub total: Decimal,
    /// Pool-share percentage snapshot (pool_share * 100).
    pub pool_share_pct: Decimal,
}

/// Full accounting state for one request.
///
/// Created zeroed, owned exclusively by the engine during the fold, and
/// returned by value. Nothing survives across requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolState {
    /// The tracked address's share-token balance. Only mint/burn transfers
    /// move it.
    pub my_share_tokens: Decimal,
    /// Total share tokens in circulation.
    pub minted_share_tokens: Decimal,
    /// Running VET reserve, display units.
    pub vet_total: Decimal,
    /// Running token reserve, display units.
    pub token_total: Decimal,
    /// Accumulated VET-side swap fee estimate.
    pub total_vet_fees: Decimal,
    /// Accumulated token-side swap fee estimate.
    pub total_token_fees: Decimal,
    /// my_share_tokens / minted_share_tokens, forced to 0 when degenerate.
    pub pool_share: Decimal,
    /// vet_total / token_total, 0 when the token reserve is empty.
    pub pool_rate: Decimal,
    /// Fee estimate in VET-equivalent terms.
    pub pool_fees: Decimal,
    /// VET-equivalent unrealized gain versus the deposit basis.
    pub current_profit: Decimal,
    pub deposited: DepositBasis,
}

impl PoolState {
    pub fn new() -> Self {
        Self::default()
    }
}
