use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::AppState;
use crate::datasource::decode_event;
use crate::domain::{Address, PoolEvent};
use crate::engine::{AccountingEngine, DisplayMetrics, RoiCalculator};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub your_vet: String,
    pub your_token: String,
    pub investment_today: String,
    pub value_hold: String,
    pub net_roi: String,
    pub price_roi: String,
    pub vexchange_roi: String,
    pub total_deposited: String,
}

impl From<DisplayMetrics> for PositionResponse {
    fn from(metrics: DisplayMetrics) -> Self {
        PositionResponse {
            your_vet: metrics.your_vet.to_display_4dp(),
            your_token: metrics.your_token.to_display_4dp(),
            investment_today: metrics.investment_today.to_display_4dp(),
            value_hold: metrics.value_hold.to_display_4dp(),
            net_roi: metrics.net_roi.to_display_4dp(),
            price_roi: metrics.price_roi.to_display_4dp(),
            vexchange_roi: metrics.vexchange_roi.to_display_4dp(),
            total_deposited: metrics.total_deposited.to_display_4dp(),
        }
    }
}

/// Reconstruct the position of `address` in the requested token's pool and
/// report its ROI decomposition.
pub async fn get_position(
    Path(address): Path<String>,
    Query(params): Query<PositionQuery>,
    State(state): State<AppState>,
) -> Result<Json<PositionResponse>, AppError> {
    let tracked = Address::parse(&address)
        .map_err(|_| AppError::BadRequest("Invalid account address".to_string()))?;

    // Resolve the token before touching any upstream.
    let symbol = params
        .token
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(state.config.default_token.as_str());
    let token = state
        .config
        .tokens
        .get(symbol)
        .ok_or_else(|| AppError::UnknownToken(symbol.to_string()))?
        .clone();

    let events_fut = async {
        let head = state.event_source.head_block().await?;
        state
            .event_source
            .fetch_events(&token.exchange_address, state.config.start_block, head)
            .await
    };
    let price_fut = state.price_oracle.usd_price(&state.config.vet_price_id);

    // The price lookup is independent of the fold and runs alongside the
    // range query.
    let (raw_events, vet_price) = tokio::join!(events_fut, price_fut);
    let raw_events = raw_events?;
    let vet_price = vet_price?;

    let events: Vec<PoolEvent> = raw_events
        .iter()
        .map(decode_event)
        .collect::<Result<_, _>>()?;

    debug!(
        "Reducing {} events for address={}, token={}",
        events.len(),
        tracked,
        token.symbol
    );

    let engine = AccountingEngine::new(
        tracked,
        token.decimals,
        state.config.provider_fee_rate,
        state.valuator.clone(),
    );
    let pool_state = engine.reduce(&events).await?;

    let metrics = RoiCalculator::compute_display(&pool_state, vet_price);
    Ok(Json(metrics.into()))
}

#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub tokens: Vec<String>,
}

/// List the token symbols this deployment knows about.
pub async fn get_tokens(State(state): State<AppState>) -> Json<TokensResponse> {
    Json(TokensResponse {
        tokens: state.config.tokens.symbols(),
    })
}
