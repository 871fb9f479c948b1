use serde::{Deserialize, Serialize};

/// A quote as returned by `GET /marketdata/price/{symbol}`.
///
/// Also the record type of the persisted price-history cache, hence the
/// `Serialize` derive.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
    pub timestamp: String,
}
