//! The event-fold accounting engine.
//!
//! A strict left fold over the chronological event sequence. Every step
//! applies the event's reserve/share effects, then re-derives pool share and
//! profit figures from the running tallies. Order matters: mint/burn signs
//! and fee accumulation are not commutative across events.

use super::deposit::DepositTracker;
use super::pool_state::PoolState;
use super::EngineError;
use crate::datasource::TransactionValuator;
use crate::domain::{Address, Decimal, PoolEvent, TxHash};
use std::sync::Arc;

/// Folds a decoded event sequence into the tracked address's position.
#[derive(Debug, Clone)]
pub struct AccountingEngine {
    tracked: Address,
    token_scale: Decimal,
    wei_scale: Decimal,
    fee_rate: Decimal,
    deposits: DepositTracker,
}

impl AccountingEngine {
    pub fn new(
        tracked: Address,
        token_decimals: u32,
        fee_rate: Decimal,
        valuator: Arc<dyn TransactionValuator>,
    ) -> Self {
        let token_scale = Decimal::ten_pow(token_decimals);
        Self {
            deposits: DepositTracker::new(tracked.clone(), token_scale, valuator),
            tracked,
            token_scale,
            wei_scale: Decimal::ten_pow(18),
            fee_rate,
        }
    }

    /// Reduce the full ordered event sequence into a final [`PoolState`].
    ///
    /// Deterministic: the same sequence always produces the same state.
    /// Each transaction valuation completes before the next event is folded.
    pub async fn reduce(&self, events: &[PoolEvent]) -> Result<PoolState, EngineError> {
        let mut state = PoolState::new();
        for event in events {
            self.apply(&mut state, event).await?;
        }
        Ok(state)
    }

    async fn apply(&self, state: &mut PoolState, event: &PoolEvent) -> Result<(), EngineError> {
        let mut vet_delta = Decimal::zero();
        let mut token_delta = Decimal::zero();
        let mut vet_fee = Decimal::zero();
        let mut token_fee = Decimal::zero();
        // (provider, tx, is_deposit) for liquidity events, applied below.
        let mut liquidity: Option<(&Address, &TxHash, bool)> = None;

        match event {
            PoolEvent::AddLiquidity {
                provider,
                eth_amount,
                token_amount,
                tx_hash,
            } => {
                vet_delta = self.scale_vet(*eth_amount);
                token_delta = self.scale_token(*token_amount);
                liquidity = Some((provider, tx_hash, true));
            }
            PoolEvent::RemoveLiquidity {
                provider,
                eth_amount,
                token_amount,
                tx_hash,
            } => {
                vet_delta = -self.scale_vet(*eth_amount);
                token_delta = -self.scale_token(*token_amount);
                // A removal carries the pre-removal flag forward instead of
                // recording a deposit of its own.
                liquidity = Some((provider, tx_hash, state.deposited.has_deposit));
            }
            PoolEvent::Transfer {
                from, to, value, ..
            } => {
                if to.is_zero() {
                    state.minted_share_tokens = state.minted_share_tokens - *value;
                    if *from == self.tracked {
                        state.my_share_tokens = state.my_share_tokens - *value;
                    }
                } else if from.is_zero() {
                    state.minted_share_tokens = state.minted_share_tokens + *value;
                    if *to == self.tracked {
                        state.my_share_tokens = state.my_share_tokens + *value;
                    }
                }
                // Transfers between two live accounts don't change supply or
                // the tracked balance; ownership churn among third parties is
                // invisible to this position tracker.
            }
            PoolEvent::EthPurchase {
                tokens_sold,
                eth_bought,
                ..
            } => {
                token_delta = self.scale_token(*tokens_sold);
                vet_delta = -self.scale_vet(*eth_bought);
                vet_fee = self.swap_fee(vet_delta);
            }
            PoolEvent::TokenPurchase {
                eth_sold,
                tokens_bought,
                ..
            } => {
                token_delta = -self.scale_token(*tokens_bought);
                vet_delta = self.scale_vet(*eth_sold);
                token_fee = self.swap_fee(token_delta);
            }
        }

        state.vet_total = state.vet_total + vet_delta;
        state.token_total = state.token_total + token_delta;
        state.total_vet_fees = state.total_vet_fees + vet_fee;
        state.total_token_fees = state.total_token_fees + token_fee;

        // Pool share with the zero policy: a degenerate quotient forces the
        // share to zero and wipes the reserve-side deposit basis.
        match state
            .my_share_tokens
            .checked_div(state.minted_share_tokens)
        {
            Some(share) => state.pool_share = share,
            None => {
                state.pool_share = Decimal::zero();
                state.deposited.vet = Decimal::zero();
                state.deposited.tokens = Decimal::zero();
            }
        }

        if let Some((provider, tx_hash, is_deposit)) = liquidity {
            self.deposits
                .on_liquidity_event(state, provider, tx_hash, vet_delta, token_delta, is_deposit)
                .await?;
        }

        state.pool_rate = state
            .vet_total
            .checked_div(state.token_total)
            .unwrap_or_else(Decimal::zero);
        state.pool_fees = state.total_vet_fees + state.total_token_fees * state.pool_rate;
        state.current_profit = (state.pool_share * state.token_total - state.deposited.tokens)
            * state.pool_rate
            + (state.pool_share * state.vet_total - state.deposited.vet);
        state.deposited.pool_share_pct = state.pool_share * Decimal::hundred();

        Ok(())
    }

    fn scale_vet(&self, raw: Decimal) -> Decimal {
        raw.checked_div(self.wei_scale).unwrap_or_else(Decimal::zero)
    }

    fn scale_token(&self, raw: Decimal) -> Decimal {
        raw.checked_div(self.token_scale)
            .unwrap_or_else(Decimal::zero)
    }

    /// Provider fee estimate for a swap outflow `delta` (negative): the
    /// gross amount before the fee minus the net amount paid out.
    fn swap_fee(&self, delta: Decimal) -> Decimal {
        let kept = Decimal::one() - self.fee_rate;
        match (-delta).checked_div(kept) {
            Some(gross) => gross + delta,
            None => Decimal::zero(),
        }
    }
}
