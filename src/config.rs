use crate::domain::{Address, Decimal};
use std::collections::HashMap;
use thiserror::Error;

/// A listed token: its exchange (pool) contract and decimal places.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub symbol: String,
    pub exchange_address: Address,
    pub decimals: u32,
}

/// Static symbol -> token mapping, loaded once at process start.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: HashMap<String, TokenInfo>,
}

impl TokenRegistry {
    /// The Vexchange v1 listings this service knows about.
    pub fn builtin() -> Self {
        let entries = [
            ("VTHO", "0xf9f99f982f3ea9020f0a0afd4d4679dfee1b63cf", 18),
            ("OCE", "0xdc391a5dbb89a3f768c41cfa0e85dcaaf3a91f91", 18),
            ("PLA", "0xd293f479254d5f6494c66a4982c7ca514a53d7c4", 18),
            ("SHA", "0xc19cf5dfb71374b920f786078d37b5225cfcf30e", 18),
            ("DBET", "0x18c2385481cdf28779ac271272398dd61cc8cf3e", 18),
        ];

        let mut tokens = HashMap::new();
        for (symbol, exchange, decimals) in entries {
            tokens.insert(
                symbol.to_string(),
                TokenInfo {
                    symbol: symbol.to_string(),
                    exchange_address: Address::parse(exchange)
                        .expect("builtin exchange addresses are valid"),
                    decimals,
                },
            );
        }
        TokenRegistry { tokens }
    }

    pub fn get(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens.get(symbol)
    }

    /// All known symbols, sorted for stable output.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.tokens.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the VeChain Thor node (event log + transaction queries).
    pub node_url: String,
    /// Base URL of the spot-price API.
    pub price_api_url: String,
    /// First block to scan; the historic pool deployment height.
    pub start_block: u64,
    /// Provider fee rate used for swap fee estimates (e.g. 0.01 for 1%).
    pub provider_fee_rate: Decimal,
    /// Token symbol assumed when the request omits `token`.
    pub default_token: String,
    /// Pricing-service slug for the VET spot price.
    pub vet_price_id: String,
    /// Per-call timeout for upstream HTTP requests.
    pub upstream_timeout_ms: u64,
    pub tokens: TokenRegistry,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let node_url = env_map
            .get("NODE_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("NODE_URL".to_string()))?;

        let price_api_url = env_map
            .get("PRICE_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://api.coingecko.com".to_string());

        let start_block = env_map
            .get("START_BLOCK")
            .map(|s| s.as_str())
            .unwrap_or("1775000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "START_BLOCK".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        let provider_fee_rate = env_map
            .get("PROVIDER_FEE_RATE")
            .map(|s| s.as_str())
            .unwrap_or("0.01")
            .parse::<Decimal>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "PROVIDER_FEE_RATE".to_string(),
                    "must be a decimal fraction".to_string(),
                )
            })?;

        let tokens = TokenRegistry::builtin();

        let default_token = env_map
            .get("DEFAULT_TOKEN")
            .cloned()
            .unwrap_or_else(|| "VTHO".to_string());
        if tokens.get(&default_token).is_none() {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_TOKEN".to_string(),
                format!("unknown token symbol {}", default_token),
            ));
        }

        let vet_price_id = env_map
            .get("VET_PRICE_ID")
            .cloned()
            .unwrap_or_else(|| "vechain".to_string());

        let upstream_timeout_ms = env_map
            .get("UPSTREAM_TIMEOUT_MS")
            .map(|s| s.as_str())
            .unwrap_or("10000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "UPSTREAM_TIMEOUT_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        Ok(Config {
            port,
            node_url,
            price_api_url,
            start_block,
            provider_fee_rate,
            default_token,
            vet_price_id,
            upstream_timeout_ms,
            tokens,
        })
    }
}
