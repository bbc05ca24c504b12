//! ROI decomposition against simply holding VET.

use super::pool_state::PoolState;
use crate::domain::Decimal;
use serde::Serialize;

/// User-facing figures derived from a final pool state plus a spot price.
///
/// Held at full precision; 4-dp rounding happens only when formatting the
/// API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMetrics {
    pub your_vet: Decimal,
    pub your_token: Decimal,
    pub investment_today: Decimal,
    pub value_hold: Decimal,
    pub net_roi: Decimal,
    pub price_roi: Decimal,
    pub vexchange_roi: Decimal,
    pub total_deposited: Decimal,
}

/// Pure combinator of [`PoolState`] and a VET/USD spot price. No I/O.
pub struct RoiCalculator;

impl RoiCalculator {
    pub fn compute_display(state: &PoolState, vet_usd_price: Decimal) -> DisplayMetrics {
        let share_fraction = state
            .deposited
            .pool_share_pct
            .checked_div(Decimal::hundred())
            .unwrap_or_else(Decimal::zero);

        let your_vet = state.vet_total * share_fraction;
        let your_token = state.token_total * share_fraction;
        let investment_today = your_vet * vet_usd_price + state.deposited.vet * vet_usd_price;
        let value_hold = investment_today - state.current_profit * vet_usd_price;
        let total_deposited = state.deposited.total * vet_usd_price;

        // Zero basis means the ROI ratio is undefined; report the zero
        // sentinel rather than a NaN-like value.
        let net_roi = roi_pct(investment_today, total_deposited);
        let price_roi = roi_pct(value_hold, total_deposited);

        DisplayMetrics {
            your_vet,
            your_token,
            investment_today,
            value_hold,
            net_roi,
            price_roi,
            vexchange_roi: net_roi - price_roi,
            total_deposited,
        }
    }
}

fn roi_pct(value: Decimal, basis: Decimal) -> Decimal {
    match (value - basis).checked_div(basis) {
        Some(ratio) => ratio * Decimal::hundred(),
        None => Decimal::zero(),
    }
}
