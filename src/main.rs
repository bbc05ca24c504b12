use std::net::SocketAddr;
use std::sync::Arc;
use vexroi::datasource::{CoinGeckoOracle, ThorClient};
use vexroi::{api, config::Config};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // The Thor node serves both the event logs and the transaction values.
    let thor = Arc::new(ThorClient::new(
        config.node_url.clone(),
        config.upstream_timeout_ms,
    ));
    let oracle = Arc::new(CoinGeckoOracle::new(
        config.price_api_url.clone(),
        config.upstream_timeout_ms,
    ));

    let state = api::AppState::new(config, thor.clone(), oracle, thor);
    let app = api::create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
