//! Price lookup and cross-asset conversion over the spot price capability.

use crate::asset::Asset;
use crate::error::EngineError;
use crate::price_provider::{PriceQuote, SpotPriceProvider};
use futures::future::try_join;
use std::sync::Arc;
use tracing::debug;

pub struct RateService {
    provider: Arc<dyn SpotPriceProvider>,
}

impl RateService {
    pub fn new(provider: Arc<dyn SpotPriceProvider>) -> Self {
        RateService { provider }
    }

    /// Fetches one USD spot quote. Source failures and timeouts surface as
    /// [`EngineError::PriceUnavailable`].
    pub async fn quote(&self, asset: Asset) -> Result<PriceQuote, EngineError> {
        self.provider
            .spot_price(asset)
            .await
            .map_err(|e| EngineError::PriceUnavailable(e.to_string()))
    }

    /// Computes `amount * price(from) / price(to)` from two concurrent spot
    /// fetches. The ratio formula is unconditional; no pair is special-cased.
    pub async fn convert(
        &self,
        amount: f64,
        from: Asset,
        to: Asset,
    ) -> Result<f64, EngineError> {
        let (from_quote, to_quote) = try_join(
            self.provider.spot_price(from),
            self.provider.spot_price(to),
        )
        .await
        .map_err(|e| EngineError::Conversion(e.to_string()))?;

        for quote in [&from_quote, &to_quote] {
            if quote.price_usd <= 0.0 {
                return Err(EngineError::Conversion(format!(
                    "{} has no usable price",
                    quote.asset
                )));
            }
        }

        let value = amount * from_quote.price_usd / to_quote.price_usd;
        if !value.is_finite() {
            return Err(EngineError::Conversion(
                "result is not a finite number".to_string(),
            ));
        }
        debug!(
            amount,
            from = %from,
            to = %to,
            value,
            "Computed conversion"
        );
        Ok(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;

    /// Deterministic in-memory price source for engine and service tests.
    pub(crate) struct FakeSource {
        prices: HashMap<Asset, f64>,
    }

    impl FakeSource {
        pub(crate) fn new(prices: &[(Asset, f64)]) -> Self {
            FakeSource {
                prices: prices.iter().copied().collect(),
            }
        }
    }

    #[async_trait]
    impl SpotPriceProvider for FakeSource {
        async fn spot_price(&self, asset: Asset) -> Result<PriceQuote> {
            let price_usd = *self
                .prices
                .get(&asset)
                .ok_or_else(|| anyhow!("no price for {asset}"))?;
            Ok(PriceQuote {
                asset,
                price_usd,
                fetched_at: Utc::now(),
            })
        }
    }

    fn service(prices: &[(Asset, f64)]) -> RateService {
        RateService::new(Arc::new(FakeSource::new(prices)))
    }

    #[tokio::test]
    async fn test_quote_success() {
        let rates = service(&[(Asset::Btc, 60000.0)]);
        let quote = rates.quote(Asset::Btc).await.unwrap();
        assert_eq!(quote.price_usd, 60000.0);
    }

    #[tokio::test]
    async fn test_quote_failure_is_price_unavailable() {
        let rates = service(&[]);
        assert!(matches!(
            rates.quote(Asset::Btc).await,
            Err(EngineError::PriceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_convert_ratio() {
        let rates = service(&[(Asset::Btc, 60000.0), (Asset::Eth, 3000.0)]);
        let value = rates.convert(0.5, Asset::Btc, Asset::Eth).await.unwrap();
        assert!((value - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_convert_through_usd() {
        let rates = service(&[(Asset::Btc, 60000.0), (Asset::Usd, 1.0)]);
        let value = rates.convert(2.0, Asset::Btc, Asset::Usd).await.unwrap();
        assert!((value - 120000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_convert_with_failing_leg() {
        let rates = service(&[(Asset::Btc, 60000.0)]);
        assert!(matches!(
            rates.convert(1.0, Asset::Btc, Asset::Eth).await,
            Err(EngineError::Conversion(_))
        ));
    }

    #[tokio::test]
    async fn test_convert_overflow_is_an_error() {
        let rates = service(&[(Asset::Btc, 60000.0), (Asset::Doge, 0.1)]);
        assert!(matches!(
            rates.convert(1e308, Asset::Btc, Asset::Doge).await,
            Err(EngineError::Conversion(_))
        ));
    }

    #[tokio::test]
    async fn test_convert_with_zero_price() {
        let rates = service(&[(Asset::Btc, 60000.0), (Asset::Eth, 0.0)]);
        assert!(matches!(
            rates.convert(1.0, Asset::Btc, Asset::Eth).await,
            Err(EngineError::Conversion(_))
        ));
    }
}
