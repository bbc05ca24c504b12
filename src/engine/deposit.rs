//! Deposit-basis tracking for the tracked address's liquidity events.

use super::pool_state::PoolState;
use super::EngineError;
use crate::datasource::TransactionValuator;
use crate::domain::{Address, Decimal, TxHash};
use std::sync::Arc;
use tracing::debug;

/// Accumulates the tracked address's cost basis during the fold.
///
/// Fires only for liquidity events whose provider is the tracked address.
/// Each qualifying event triggers one transaction-value lookup; the lookup
/// must complete before the fold advances, since later profit figures read
/// the updated basis.
#[derive(Debug, Clone)]
pub struct DepositTracker {
    tracked: Address,
    token_scale: Decimal,
    valuator: Arc<dyn TransactionValuator>,
}

impl DepositTracker {
    pub fn new(tracked: Address, token_scale: Decimal, valuator: Arc<dyn TransactionValuator>) -> Self {
        Self {
            tracked,
            token_scale,
            valuator,
        }
    }

    /// Apply one AddLiquidity/RemoveLiquidity event to the deposit basis.
    ///
    /// `is_deposit` is recorded verbatim into `has_deposit`: additions pass
    /// `true`, removals pass the pre-removal flag.
    pub async fn on_liquidity_event(
        &self,
        state: &mut PoolState,
        provider: &Address,
        tx_hash: &TxHash,
        vet_delta: Decimal,
        token_delta: Decimal,
        is_deposit: bool,
    ) -> Result<(), EngineError> {
        if *provider != self.tracked {
            return Ok(());
        }

        state.deposited.vet = state.deposited.vet + vet_delta;
        state.deposited.tokens = state.deposited.tokens + token_delta;

        // A missed valuation would corrupt the basis for the rest of the
        // fold, so failure aborts the whole request.
        let raw_value = self
            .valuator
            .transaction_value(tx_hash)
            .await
            .map_err(|source| EngineError::Valuation {
                tx_hash: tx_hash.to_string(),
                source,
            })?;
        let scaled = raw_value
            .checked_div(self.token_scale)
            .unwrap_or_else(Decimal::zero);
        state.deposited.total = state.deposited.total + scaled;
        state.deposited.has_deposit = is_deposit;

        debug!(
            "Deposit basis updated: vet={}, tokens={}, total={}",
            state.deposited.vet, state.deposited.tokens, state.deposited.total
        );
        Ok(())
    }
}
