use serde::Deserialize;

/// A portfolio position as returned by `GET /portfolio/holdings`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub avg_price: f64,
}

impl Holding {
    /// Market value of the position at the given price.
    pub fn value_at(&self, price: f64) -> f64 {
        price * self.quantity
    }

    /// Unrealized profit at the given price.
    pub fn profit_at(&self, price: f64) -> f64 {
        (price - self.avg_price) * self.quantity
    }
}
