//! Response structures for the SimplyWall.st API.
//!
//! Only the fields the connector reads are mapped; the API returns many
//! more. Relationship payloads (`items`, `items.transactions`) are
//! present only when requested via the `include` query parameter, hence
//! the `Option` wrappers.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response from the OAuth token endpoint (both grant types).
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response from the portfolio-read endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct PortfolioResponse {
    pub data: Vec<Portfolio>,
}

/// One portfolio, with its items when `include=items` was requested.
#[derive(Debug, Deserialize)]
pub(super) struct Portfolio {
    pub id: i64,
    pub items: Option<ItemCollection>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ItemCollection {
    pub data: Vec<PortfolioItem>,
}

/// A position held in a portfolio, keyed by `unique_symbol`
/// (`EXCHANGE:TICKER`).
#[derive(Debug, Deserialize)]
pub(super) struct PortfolioItem {
    pub id: i64,
    pub unique_symbol: String,
    pub transactions: Option<TransactionCollection>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransactionCollection {
    pub data: Vec<PortfolioTransaction>,
}

/// A transaction as returned by the API under
/// `include=items,items.transactions`.
#[derive(Debug, Deserialize)]
pub(super) struct PortfolioTransaction {
    #[serde(rename = "type")]
    pub kind: String,
    /// Milliseconds since epoch, UTC midnight of the trade day.
    pub date: i64,
    /// Share count; the API reports it as a number that may carry a
    /// fractional part.
    pub amount: f64,
    pub cost: Decimal,
}

/// One candidate from the legacy ticker-search endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct SearchCandidate {
    pub value: String,
}

/// A flattened SimplyWall.st transaction, in exactly the shape the
/// transaction-creation form is submitted in.
///
/// Structural equality of these fields against previously fetched
/// records is the duplicate-detection identity for the REST connector.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionRecord {
    /// Position (item) id, as the form submits it.
    pub item_id: String,
    /// "Buy" or "Sell" as the service reports it.
    pub kind: String,
    /// Milliseconds since epoch at UTC midnight of the trade day.
    pub date: i64,
    /// Share count, coerced to an integer.
    pub amount: i64,
    /// Price per share as reported.
    pub cost: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_portfolio_response_parsing() {
        let json = r#"{
            "data": [
                {
                    "id": 193324,
                    "name": "Main",
                    "currency": "USD",
                    "items": {
                        "data": [
                            {"id": 4711, "unique_symbol": "NYSE:IBM", "shares": 10},
                            {"id": 4712, "unique_symbol": "NasdaqGS:MSFT", "shares": 5}
                        ]
                    }
                }
            ]
        }"#;

        let response: PortfolioResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 1);
        let portfolio = &response.data[0];
        assert_eq!(portfolio.id, 193324);
        let items = &portfolio.items.as_ref().unwrap().data;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 4711);
        assert_eq!(items[0].unique_symbol, "NYSE:IBM");
        assert!(items[0].transactions.is_none());
    }

    #[test]
    fn test_portfolio_without_items_include() {
        let json = r#"{"data": [{"id": 193324, "name": "Main"}]}"#;
        let response: PortfolioResponse = serde_json::from_str(json).unwrap();
        assert!(response.data[0].items.is_none());
    }

    #[test]
    fn test_transaction_parsing() {
        let json = r#"{
            "type": "Buy",
            "date": 1609718400000,
            "amount": 10.0,
            "cost": 150.25,
            "currency": "USD"
        }"#;

        let transaction: PortfolioTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.kind, "Buy");
        assert_eq!(transaction.date, 1609718400000);
        assert_eq!(transaction.amount, 10.0);
        assert_eq!(transaction.cost, dec!(150.25));
    }

    #[test]
    fn test_token_response_requires_both_tokens() {
        let json = r#"{"access_token": "at", "refresh_token": "rt", "expires_in": 3600}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "at");
        assert_eq!(response.refresh_token, "rt");

        // An error body without tokens must fail to parse; the connector
        // turns that into a fatal UnexpectedResponse.
        let error_body = r#"{"error": "invalid_grant"}"#;
        assert!(serde_json::from_str::<TokenResponse>(error_body).is_err());
    }

    #[test]
    fn test_search_candidate_parsing() {
        let json = r#"[{"value": "NYSE:IBM", "label": "IBM"}, {"value": "NYSE:IBM.PRA"}]"#;
        let candidates: Vec<SearchCandidate> = serde_json::from_str(json).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].value, "NYSE:IBM.PRA");
    }
}
