//! Wire-format tests for the service payload types.

use folio::models::{
    Holding, LoginRequest, NewTransaction, PriceQuote, RiskHistoryPoint, RiskReport,
    SignupRequest, TradeSide, Transaction,
};

const HOLDINGS_JSON: &str = include_str!("fixtures/holdings.json");
const TRANSACTIONS_JSON: &str = include_str!("fixtures/transactions.json");
const RISK_REPORT_JSON: &str = include_str!("fixtures/risk_report.json");
const PRICE_JSON: &str = include_str!("fixtures/price.json");
const RISK_HISTORY_JSON: &str = include_str!("fixtures/risk_history.json");

#[test]
fn test_holdings_deserialize() {
    let holdings: Vec<Holding> =
        serde_json::from_str(HOLDINGS_JSON).expect("Failed to deserialize holdings");

    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[0].symbol, "AAPL");
    assert_eq!(holdings[0].quantity, 10.0);
    assert_eq!(holdings[0].avg_price, 150.25);
    assert_eq!(holdings[0].value_at(160.0), 1600.0);
    assert_eq!(holdings[1].profit_at(2900.0), 250.0);
}

#[test]
fn test_transactions_deserialize() {
    let transactions: Vec<Transaction> =
        serde_json::from_str(TRANSACTIONS_JSON).expect("Failed to deserialize transactions");

    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].side, TradeSide::Buy);
    assert_eq!(transactions[1].side, TradeSide::Sell);
    assert_eq!(transactions[1].total(), 648.0);
    assert_eq!(transactions[0].timestamp, "2024-01-15T10:30:00");
}

#[test]
fn test_new_transaction_serializes_side_as_type() {
    let new_tx = NewTransaction {
        symbol: "MSFT".to_string(),
        quantity: 3.0,
        price: 410.5,
        side: TradeSide::Sell,
    };

    let value = serde_json::to_value(&new_tx).expect("Failed to serialize transaction");
    assert_eq!(value["symbol"], "MSFT");
    assert_eq!(value["type"], "SELL");
    assert!(value.get("side").is_none());
}

#[test]
fn test_risk_report_deserializes() {
    let report: RiskReport =
        serde_json::from_str(RISK_REPORT_JSON).expect("Failed to deserialize risk report");

    assert_eq!(report.user_id, Some(1));
    assert_eq!(report.total_exposure, 6501.5);
    assert_eq!(report.position_count(), 2);
    assert_eq!(report.positions["AAPL"], 6);
    assert_eq!(report.last_updated, "2024-02-20T14:05:01");
}

#[test]
fn test_risk_report_tolerates_missing_optional_fields() {
    let report: RiskReport =
        serde_json::from_str(r#"{"totalExposure": 0.0, "lastUpdated": "t"}"#)
            .expect("Failed to deserialize minimal risk report");

    assert_eq!(report.user_id, None);
    assert!(report.positions.is_empty());
}

#[test]
fn test_price_quote_round_trips() {
    let quote: PriceQuote =
        serde_json::from_str(PRICE_JSON).expect("Failed to deserialize price quote");
    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.price, 161.8);

    // The quote is also the persisted cache record, so it must serialize back.
    let value = serde_json::to_value(&quote).expect("Failed to serialize price quote");
    assert_eq!(value["timestamp"], "2024-02-20T14:05:00");
}

#[test]
fn test_risk_history_deserializes() {
    let points: Vec<RiskHistoryPoint> =
        serde_json::from_str(RISK_HISTORY_JSON).expect("Failed to deserialize risk history");

    assert_eq!(points.len(), 3);
    assert_eq!(points[2].date, "2024-02-20");
    assert_eq!(points[2].exposure, 6501.5);
}

#[test]
fn test_auth_requests_serialize() {
    let signup = SignupRequest {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password: "secret".to_string(),
    };
    let value = serde_json::to_value(&signup).expect("Failed to serialize signup request");
    assert_eq!(value["name"], "Ada");
    assert_eq!(value["email"], "ada@example.com");

    let login = LoginRequest {
        email: "ada@example.com".to_string(),
        password: "secret".to_string(),
    };
    let value = serde_json::to_value(&login).expect("Failed to serialize login request");
    assert_eq!(value["password"], "secret");
}
