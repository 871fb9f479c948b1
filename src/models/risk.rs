use std::collections::BTreeMap;

use serde::Deserialize;

/// A risk snapshot, delivered both by `GET /analytics/risk/{userId}` and as
/// JSON frames on the analytics stream. Replaced wholesale on every receipt;
/// the client never merges two snapshots.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    #[serde(default)]
    pub user_id: Option<u64>,
    /// Net quantity per symbol.
    #[serde(default)]
    pub positions: BTreeMap<String, i64>,
    pub total_exposure: f64,
    pub last_updated: String,
}

impl RiskReport {
    /// Number of distinct open positions.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }
}

/// One point of the historical exposure trend from
/// `GET /analytics/history/{userId}`.
#[derive(Clone, Debug, Deserialize)]
pub struct RiskHistoryPoint {
    pub date: String,
    pub exposure: f64,
}
