pub mod coingecko;
pub mod util;
