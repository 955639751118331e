//! SimplyWall.st connector.
//!
//! Talks to the documented SimplyWall.st JSON API:
//! - OAuth password grant (with refresh-token grant when one is cached)
//! - Portfolio graph reads with relationship includes
//! - Position (item) creation
//! - Transaction submission with structural duplicate detection
//! - Legacy ticker search
//!
//! The bearer token and the list of already-known transactions are both
//! fetched lazily, once, and cached for the lifetime of the instance.
//! Neither is ever refreshed, even on expiry; an expired token simply
//! makes subsequent calls fail, which is the caller's signal to start
//! over with a fresh connector.

mod models;

use chrono::{NaiveDate, NaiveTime};
use log::{info, warn};
use reqwest::blocking::Client;

use crate::connector::PortfolioConnector;
use crate::errors::ConnectorError;
use crate::models::{Credentials, TickerRef, Trade};

use models::{Portfolio, PortfolioResponse, SearchCandidate, TokenResponse};

pub use models::TransactionRecord;

const TOKEN_URL: &str = "https://api.simplywall.st/oauth/token";
const PORTFOLIO_URL: &str = "https://api.simplywall.st/api/user/portfolio";
const ITEM_URL: &str = "https://api.simplywall.st/api/user/portfolio/item";
const TRANSACTION_URL: &str = "https://api.simplywall.st/api/user/portfolio/transaction";
const LEGACY_SEARCH_URL: &str = "https://legacy.simplywall.st/api/search";

const PROVIDER_ID: &str = "SIMPLYWALLST";

/// Client id of the public SimplyWall.st web application.
const DEFAULT_CLIENT_ID: &str = "90989a0528ad4b238480f1ac0f5855e5";
const OAUTH_SCOPE: &str = "public read:user write:user read:portfolio write:portfolio";

/// Connector for the SimplyWall.st JSON API.
pub struct SimplyWallStConnector {
    client: Client,
    credentials: Credentials,
    portfolio_id: String,
    client_id: String,
    bearer_token: Option<String>,
    refresh_token: Option<String>,
    known_transactions: Option<Vec<TransactionRecord>>,
}

impl SimplyWallStConnector {
    /// Create a connector for one portfolio.
    ///
    /// `portfolio_id` is the numeric portfolio id visible in the
    /// portfolio's URL, as a string. Authentication happens lazily on
    /// the first call that needs it.
    pub fn new(credentials: Credentials, portfolio_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            credentials,
            portfolio_id: portfolio_id.into(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            bearer_token: None,
            refresh_token: None,
            known_transactions: None,
        }
    }

    /// Override the OAuth client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Exchange credentials for tokens if no bearer token is cached yet,
    /// and return the bearer token.
    ///
    /// Uses the refresh-token grant when a refresh token is already
    /// cached from an earlier exchange, the password grant otherwise. A
    /// non-success status is logged as a warning but the body is still
    /// read; a body without tokens is fatal.
    fn bearer_token(&mut self) -> Result<String, ConnectorError> {
        if let Some(token) = &self.bearer_token {
            return Ok(token.clone());
        }

        info!("SimplyWall.st: exchanging credentials for access tokens");
        let form: Vec<(&str, &str)> = match &self.refresh_token {
            Some(refresh_token) => vec![
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
            None => vec![
                ("client_id", &self.client_id),
                ("grant_type", "password"),
                ("password", self.credentials.password()),
                ("username", self.credentials.email()),
                ("scope", OAUTH_SCOPE),
                ("provider", "sws"),
                ("cross_client", "false"),
            ],
        };

        let response = self.client.post(TOKEN_URL).form(&form).send()?;
        let status = response.status();
        let body = response.text()?;
        if status.is_success() {
            info!("SimplyWall.st: got access tokens");
        } else {
            warn!("SimplyWall.st: token exchange returned HTTP {status}: {body}");
        }

        let tokens: TokenResponse = serde_json::from_str(&body).map_err(|_| {
            ConnectorError::unexpected(PROVIDER_ID, "token endpoint body carries no tokens")
        })?;
        self.refresh_token = Some(tokens.refresh_token);
        Ok(self.bearer_token.insert(tokens.access_token).clone())
    }

    /// Fetch the portfolio graph with the given relationship includes
    /// (`items` or `items,items.transactions`).
    fn fetch_portfolios(&mut self, include: &str) -> Result<Vec<Portfolio>, ConnectorError> {
        let token = self.bearer_token()?;
        let response: PortfolioResponse = self
            .client
            .get(PORTFOLIO_URL)
            .query(&[("include", include), ("sharing", "false")])
            .bearer_auth(token)
            .send()?
            .json()?;
        Ok(response.data)
    }

    /// All transactions already present in the configured portfolio,
    /// flattened into the form-field shape used for duplicate checks.
    ///
    /// Returns `Ok(None)` when the configured portfolio is absent.
    pub fn existing_transactions(
        &mut self,
    ) -> Result<Option<Vec<TransactionRecord>>, ConnectorError> {
        info!("SimplyWall.st: fetching existing transactions");
        let portfolios = self.fetch_portfolios("items,items.transactions")?;
        let Some(portfolio) = portfolios.iter().find(|p| p.id.to_string() == self.portfolio_id)
        else {
            warn!(
                "SimplyWall.st: portfolio {} not found while fetching transactions",
                self.portfolio_id
            );
            return Ok(None);
        };
        Ok(Some(flatten_transactions(portfolio)))
    }

    /// Resolve a ticker against the legacy search endpoint.
    ///
    /// Returns the canonical symbol only when exactly one candidate,
    /// with internal periods stripped, equals `EXCHANGE:TICKER`; zero or
    /// several candidates yield `None` rather than a choice.
    pub fn search_symbol(ticker: &TickerRef) -> Result<Option<String>, ConnectorError> {
        let url = format!("{}/{}", LEGACY_SEARCH_URL, ticker.unique_symbol());
        let candidates: Vec<SearchCandidate> = reqwest::blocking::get(url)?.json()?;
        Ok(unique_search_match(candidates, &ticker.unique_symbol()))
    }
}

impl PortfolioConnector for SimplyWallStConnector {
    type PositionId = i64;

    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn resolve_position_id(
        &mut self,
        ticker: &TickerRef,
    ) -> Result<Option<i64>, ConnectorError> {
        info!("SimplyWall.st: resolving position id for {ticker}");
        let portfolios = self.fetch_portfolios("items")?;
        find_position_id(&portfolios, &self.portfolio_id, &ticker.unique_symbol())
    }

    fn create_position(&mut self, ticker: &TickerRef) -> Result<(), ConnectorError> {
        info!("SimplyWall.st: creating position for {ticker}");
        let token = self.bearer_token()?;
        let payload = serde_json::json!({
            "portfolio_id": self.portfolio_id,
            "unique_symbol": ticker.unique_symbol(),
        });
        let response = self
            .client
            .post(ITEM_URL)
            .bearer_auth(token)
            .json(&payload)
            .send()?;
        if !response.status().is_success() {
            warn!(
                "SimplyWall.st: could not create position for {ticker}: {}",
                response.text().unwrap_or_default()
            );
        }
        Ok(())
    }

    fn add_trade(
        &mut self,
        position_id: &i64,
        trade: &Trade,
        skip_duplicate: bool,
    ) -> Result<(), ConnectorError> {
        let record = TransactionRecord {
            item_id: position_id.to_string(),
            kind: trade.side.as_str().to_string(),
            date: utc_midnight_millis(trade.date),
            amount: trade.shares,
            cost: trade.price,
        };

        if skip_duplicate {
            if self.known_transactions.is_none() {
                let known = self.existing_transactions()?.unwrap_or_default();
                self.known_transactions = Some(known);
            }
            if self
                .known_transactions
                .as_deref()
                .is_some_and(|known| known.contains(&record))
            {
                warn!("SimplyWall.st: transaction {record:?} already exists, skipping");
                return Ok(());
            }
        }

        let token = self.bearer_token()?;
        let form = [
            ("item_id", record.item_id.clone()),
            ("type", record.kind.clone()),
            ("date", record.date.to_string()),
            ("amount", record.amount.to_string()),
            ("cost", record.cost.to_string()),
        ];
        let response = self
            .client
            .post(TRANSACTION_URL)
            .bearer_auth(token)
            .form(&form)
            .send()?;
        if !response.status().is_success() {
            warn!(
                "SimplyWall.st: could not add transaction {record:?}: {}",
                response.text().unwrap_or_default()
            );
        }
        Ok(())
    }
}

/// Milliseconds since epoch at UTC midnight of the given calendar day.
///
/// Time-of-day is never part of a trade record here, so two submissions
/// on the same day always produce the same timestamp no matter what the
/// caller's source data carried.
fn utc_midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Find the unique position matching `unique_symbol` in the configured
/// portfolio.
///
/// Zero portfolios or zero matches are normal (`Ok(None)`); several
/// matches for the same key mean the remote data is inconsistent and
/// fail hard.
fn find_position_id(
    portfolios: &[Portfolio],
    portfolio_id: &str,
    unique_symbol: &str,
) -> Result<Option<i64>, ConnectorError> {
    let Some(portfolio) = portfolios.iter().find(|p| p.id.to_string() == portfolio_id) else {
        warn!("SimplyWall.st: no portfolio {portfolio_id} while looking for {unique_symbol}");
        return Ok(None);
    };

    let items = portfolio
        .items
        .as_ref()
        .map(|items| items.data.as_slice())
        .unwrap_or_default();
    let matches: Vec<i64> = items
        .iter()
        .filter(|item| item.unique_symbol == unique_symbol)
        .map(|item| item.id)
        .collect();

    match matches.as_slice() {
        [] => {
            info!("SimplyWall.st: no position for {unique_symbol} in portfolio {portfolio_id}");
            Ok(None)
        }
        [id] => Ok(Some(*id)),
        _ => Err(ConnectorError::AmbiguousPosition {
            symbol: unique_symbol.to_string(),
            portfolio_id: portfolio_id.to_string(),
        }),
    }
}

/// Flatten a portfolio's items and their transactions into records in
/// submission shape.
fn flatten_transactions(portfolio: &Portfolio) -> Vec<TransactionRecord> {
    let items = portfolio
        .items
        .as_ref()
        .map(|items| items.data.as_slice())
        .unwrap_or_default();
    items
        .iter()
        .flat_map(|item| {
            let transactions = item
                .transactions
                .as_ref()
                .map(|t| t.data.as_slice())
                .unwrap_or_default();
            transactions.iter().map(move |transaction| TransactionRecord {
                item_id: item.id.to_string(),
                kind: transaction.kind.clone(),
                date: transaction.date,
                amount: transaction.amount as i64,
                cost: transaction.cost,
            })
        })
        .collect()
}

/// Keep the single candidate whose symbol, with internal periods
/// stripped, equals the composite key. Ambiguous results are deliberately
/// not surfaced as a choice.
fn unique_search_match(candidates: Vec<SearchCandidate>, unique_symbol: &str) -> Option<String> {
    let mut matches = candidates
        .into_iter()
        .map(|candidate| candidate.value)
        .filter(|value| value.replace('.', "") == unique_symbol);
    match (matches.next(), matches.next()) {
        (Some(value), None) => Some(value),
        _ => None,
    }
}
