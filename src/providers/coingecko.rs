use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::asset::Asset;
use crate::price_provider::{PriceQuote, SpotPriceProvider};
use crate::providers::util::with_retry;

const RETRY_DELAY_MS: u64 = 250;

/// Spot price provider backed by the CoinGecko `simple/price` endpoint.
pub struct CoinGeckoProvider {
    base_url: String,
    timeout: Duration,
    retries: usize,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, timeout: Duration, retries: usize) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
            timeout,
            retries,
        }
    }
}

#[derive(Deserialize, Debug)]
struct AssetPrice {
    usd: Option<f64>,
}

#[async_trait]
impl SpotPriceProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoSpotPrice",
        skip(self),
        fields(asset = %asset)
    )]
    async fn spot_price(&self, asset: Asset) -> Result<PriceQuote> {
        let fetched_at = Utc::now();

        // USD is the quote currency itself; no fetch needed.
        let Some(id) = asset.source_id() else {
            return Ok(PriceQuote {
                asset,
                price_usd: 1.0,
                fetched_at,
            });
        };

        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base_url, id
        );
        debug!("Requesting spot price from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("pricebot/0.1")
            .timeout(self.timeout)
            .build()?;

        let response = with_retry(|| client.get(&url).send(), self.retries, RETRY_DELAY_MS)
            .await
            .map_err(|e| anyhow!("Request error: {} for asset: {} URL: {}", e, asset, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for asset: {}",
                response.status(),
                asset
            ));
        }

        let data = response.json::<HashMap<String, AssetPrice>>().await?;
        let price_usd = data
            .get(id)
            .and_then(|p| p.usd)
            .ok_or_else(|| anyhow!("No price data found for asset: {}", asset))?;

        Ok(PriceQuote {
            asset,
            price_usd,
            fetched_at,
        })
    }
}
