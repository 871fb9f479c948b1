use serde::{Deserialize, Serialize};

/// Buy/sell marker, serialized as the services expect (`"BUY"`/`"SELL"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    #[default]
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl TradeSide {
    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }

    /// Toggles between sides.
    pub fn toggle(&mut self) {
        *self = match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        };
    }
}

/// A ledger entry as returned by `GET /portfolio/transactions`.
#[derive(Clone, Debug, Deserialize)]
pub struct Transaction {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub timestamp: String,
}

impl Transaction {
    /// Gross value of the trade.
    pub fn total(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Request body for `POST /portfolio/add`.
#[derive(Clone, Debug, Serialize)]
pub struct NewTransaction {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(rename = "type")]
    pub side: TradeSide,
}
