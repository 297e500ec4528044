//! Spot price abstraction and quote type.

use crate::asset::Asset;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A single USD spot quote, scoped to one request. The engine never caches
/// quotes; any caching belongs to the external source.
#[derive(Debug, Clone)]
pub struct PriceQuote {
    pub asset: Asset,
    pub price_usd: f64,
    pub fetched_at: DateTime<Utc>,
}

/// The external price source capability. Implementations must bound each
/// request with a timeout so a lookup fails instead of hanging.
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    async fn spot_price(&self, asset: Asset) -> Result<PriceQuote>;
}
