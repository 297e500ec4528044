//! Canonical assets and the static alias table.
//!
//! Every [`Asset`] in the engine comes out of [`Asset::resolve`]; there is no
//! freeform asset value anywhere downstream. The table is compile-time data,
//! so concurrent queries share it without synchronization.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Btc,
    Eth,
    Sol,
    Doge,
    Usdt,
    Usd,
}

impl Asset {
    /// Ticker used in conversion output, e.g. `0.5 BTC = 10 ETH`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Sol => "SOL",
            Asset::Doge => "DOGE",
            Asset::Usdt => "USDT",
            Asset::Usd => "USD",
        }
    }

    /// Human-readable name used in price lookup output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Asset::Btc => "Bitcoin",
            Asset::Eth => "Ethereum",
            Asset::Sol => "Solana",
            Asset::Doge => "Dogecoin",
            Asset::Usdt => "Tether",
            Asset::Usd => "US Dollar",
        }
    }

    /// Identifier the price source understands. `None` for USD, which is the
    /// quote currency itself and prices at 1.0 without a fetch.
    pub fn source_id(&self) -> Option<&'static str> {
        match self {
            Asset::Btc => Some("bitcoin"),
            Asset::Eth => Some("ethereum"),
            Asset::Sol => Some("solana"),
            Asset::Doge => Some("dogecoin"),
            Asset::Usdt => Some("tether"),
            Asset::Usd => None,
        }
    }

    /// Looks up a normalized token in the alias table. Exact match only, no
    /// fuzzy resolution.
    pub fn resolve(token: &str) -> Option<Asset> {
        let asset = match token.to_lowercase().as_str() {
            "btc" | "bitcoin" | "xbt" => Asset::Btc,
            "eth" | "ethereum" | "ether" => Asset::Eth,
            "sol" | "solana" => Asset::Sol,
            "doge" | "dogecoin" => Asset::Doge,
            "usdt" | "tether" => Asset::Usdt,
            "usd" | "dollar" | "dollars" | "usdollar" => Asset::Usd,
            _ => return None,
        };
        Some(asset)
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
