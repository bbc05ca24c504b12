pub mod health;
pub mod vexchange;

use crate::config::Config;
use crate::datasource::{EventSource, PriceOracle, TransactionValuator};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_source: Arc<dyn EventSource>,
    pub price_oracle: Arc<dyn PriceOracle>,
    pub valuator: Arc<dyn TransactionValuator>,
}

impl AppState {
    pub fn new(
        config: Config,
        event_source: Arc<dyn EventSource>,
        price_oracle: Arc<dyn PriceOracle>,
        valuator: Arc<dyn TransactionValuator>,
    ) -> Self {
        Self {
            config,
            event_source,
            price_oracle,
            valuator,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/vexchange/tokens", get(vexchange::get_tokens))
        .route("/vexchange/:address", get(vexchange::get_position))
        .layer(cors)
        .with_state(state)
}
