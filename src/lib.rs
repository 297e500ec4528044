pub mod asset;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod format;
pub mod intent;
pub mod log;
pub mod price_provider;
pub mod providers;
pub mod query;
pub mod rates;

use crate::engine::Engine;
use crate::format::Outcome;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Builds an [`Engine`] against the configured price source.
pub fn engine_from_config(config: &config::AppConfig) -> Engine {
    let provider = providers::coingecko::CoinGeckoProvider::new(
        &config.provider.base_url,
        config.provider.timeout(),
        config.provider.retries,
    );
    Engine::new(Arc::new(provider))
}

/// One-shot evaluation: load config, build the engine, answer one query.
pub async fn evaluate_query(raw: &str, config_path: Option<&str>) -> Result<Outcome> {
    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let engine = engine_from_config(&config);
    Ok(engine.evaluate(raw).await)
}
