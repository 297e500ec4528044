//! Deterministic rendering of query outcomes.

use crate::asset::Asset;
use crate::error::EngineError;
use crate::price_provider::PriceQuote;

/// Static usage text, returned verbatim for the help intent. The transport
/// also shows it once at session start.
pub const HELP_TEXT: &str = "I can answer three kinds of questions:\n\
    \n\
    \u{2022} Arithmetic: 2 + 2, (20 - 5) / 3, 2^10\n\
    \u{2022} Price lookup: price of bitcoin, eth price\n\
    \u{2022} Conversion: 0.5 btc to eth, 100 usdt in usd\n\
    \n\
    Supported assets: BTC, ETH, SOL, DOGE, USDT, USD.";

/// Shown for queries no rule matched. Guidance, not an error.
pub const GUIDANCE_TEXT: &str =
    "Sorry, I didn't understand that. Send \"help\" to see what I can do.";

const ARITHMETIC_DECIMALS: usize = 10;
const CONVERSION_DECIMALS: usize = 8;

/// Terminal value of one query. Rendered once and handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Number(f64),
    Text(String),
    Error(EngineError),
}

impl Outcome {
    pub fn render(&self) -> String {
        match self {
            Outcome::Number(value) => format_number(*value, ARITHMETIC_DECIMALS),
            Outcome::Text(text) => text.clone(),
            Outcome::Error(err) => format!("Error: {err}"),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

/// `"Bitcoin: $60000.00"` — price lookups always carry two decimals.
pub fn format_price(quote: &PriceQuote) -> String {
    format!(
        "{}: ${:.2}",
        quote.asset.display_name(),
        quote.price_usd
    )
}

/// `"0.5 BTC = 10 ETH"` — up to eight decimals, trailing zeros trimmed.
pub fn format_conversion(amount: f64, from: Asset, value: f64, to: Asset) -> String {
    format!(
        "{} {} = {} {}",
        format_number(amount, CONVERSION_DECIMALS),
        from.symbol(),
        format_number(value, CONVERSION_DECIMALS),
        to.symbol()
    )
}

/// Thousands-free decimal notation with trailing zeros (and a bare trailing
/// dot) trimmed.
fn format_number(value: f64, max_decimals: usize) -> String {
    let rendered = format!("{value:.max_decimals$}");
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}
