//! The query engine: one call from raw chat text to a rendered outcome.
//!
//! Every failure is absorbed here and becomes [`Outcome::Error`]; nothing
//! propagates to the transport as a fault, and a failed query leaves the
//! engine fully usable for the next one.

use crate::expr;
use crate::format::{self, GUIDANCE_TEXT, HELP_TEXT, Outcome};
use crate::intent::{Intent, classify};
use crate::price_provider::SpotPriceProvider;
use crate::query::Query;
use crate::rates::RateService;
use std::sync::Arc;
use tracing::debug;

pub struct Engine {
    rates: RateService,
}

impl Engine {
    pub fn new(provider: Arc<dyn SpotPriceProvider>) -> Self {
        Engine {
            rates: RateService::new(provider),
        }
    }

    pub async fn evaluate(&self, raw: &str) -> Outcome {
        let query = Query::new(raw);
        let intent = match classify(&query) {
            Ok(intent) => intent,
            Err(err) => return Outcome::Error(err),
        };
        debug!(?intent, "Classified query");

        match intent {
            Intent::Help => Outcome::Text(HELP_TEXT.to_string()),
            Intent::Arithmetic(text) => match expr::evaluate(&text) {
                Ok(value) => Outcome::Number(value),
                Err(err) => Outcome::Error(err),
            },
            Intent::PriceLookup(asset) => match self.rates.quote(asset).await {
                Ok(quote) => Outcome::Text(format::format_price(&quote)),
                Err(err) => Outcome::Error(err),
            },
            Intent::Conversion { amount, from, to } => {
                match self.rates.convert(amount, from, to).await {
                    Ok(value) => {
                        Outcome::Text(format::format_conversion(amount, from, value, to))
                    }
                    Err(err) => Outcome::Error(err),
                }
            }
            Intent::Unrecognized(_) => Outcome::Text(GUIDANCE_TEXT.to_string()),
        }
    }
}
