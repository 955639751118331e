//! WallMine connector.
//!
//! WallMine has no public API, so every operation drives the website the
//! way a browser does: a cookie-bearing session signed in through the
//! login form, an anti-forgery token harvested from the most recently
//! fetched page before each state-changing POST, and application data
//! read back out of the rendered markup (see [`page`]).
//!
//! Duplicate detection embeds an Adler-32 checksum of the trade's
//! identifying fields into the submitted note as a `#digits#` marker and
//! compares against markers scraped from the existing transactions table
//! (see [`checksum`]). The session and the checksum cache are both
//! created lazily, once, for the lifetime of the instance.

mod checksum;
mod page;

use log::{info, warn};
use reqwest::blocking::Client;

use crate::connector::PortfolioConnector;
use crate::errors::ConnectorError;
use crate::models::{Credentials, TickerRef, Trade};

const BASE_URL: &str = "https://wallmine.com";
const PROVIDER_ID: &str = "WALLMINE";

/// Connector for WallMine portfolios, driven by form scraping.
pub struct WallMineConnector {
    credentials: Credentials,
    portfolio_id: String,
    session: Option<Client>,
    known_checksums: Option<Vec<String>>,
}

impl WallMineConnector {
    /// Create a connector for one portfolio.
    ///
    /// `portfolio_id` is the numeric id from the portfolio's URL, as a
    /// string. Sign-in happens lazily on the first call that needs it.
    pub fn new(credentials: Credentials, portfolio_id: impl Into<String>) -> Self {
        Self {
            credentials,
            portfolio_id: portfolio_id.into(),
            session: None,
            known_checksums: None,
        }
    }

    /// The authenticated session, signing in first if none is cached.
    ///
    /// Sign-in fetches the login page for its anti-forgery token and
    /// posts the credentials with a "remember me" flag. A rejected login
    /// is only logged: the cookie session is cached regardless, and its
    /// subsequent authenticated calls will fail visibly. The client
    /// handle is cheap to clone (shared connection pool).
    fn session(&mut self) -> Result<Client, ConnectorError> {
        if let Some(client) = &self.session {
            return Ok(client.clone());
        }

        info!("WallMine: signing in");
        let client = Client::builder().cookie_store(true).build()?;

        let sign_in_url = format!("{BASE_URL}/users/sign-in");
        let sign_in_page = client.get(&sign_in_url).send()?.text()?;
        let token = page::csrf_token(&sign_in_page).ok_or_else(|| {
            ConnectorError::unexpected(PROVIDER_ID, "sign-in page carries no csrf-token")
        })?;

        let form = [
            ("user[email]", self.credentials.email()),
            ("user[password]", self.credentials.password()),
            ("authenticity_token", token.as_str()),
            ("user[remember_me]", "1"),
        ];
        let response = client.post(&sign_in_url).form(&form).send()?;
        if response.status().is_success() {
            info!("WallMine: signed in");
        } else {
            warn!(
                "WallMine: sign-in returned HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            );
        }

        self.session = Some(client.clone());
        Ok(client)
    }

    /// Fetch the portfolio's transactions page, optionally scoped with a
    /// ticker fragment.
    fn fetch_transactions_page(&mut self, fragment: Option<&str>) -> Result<String, ConnectorError> {
        let client = self.session()?;
        let mut url = format!("{BASE_URL}/portfolios/{}/transactions", self.portfolio_id);
        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(fragment);
        }
        Ok(client.get(url).send()?.text()?)
    }

    /// Checksums of all transactions already in the portfolio, scraped
    /// out of the notes column of the transactions table.
    pub fn existing_transactions(&mut self) -> Result<Vec<String>, ConnectorError> {
        info!("WallMine: collecting checksums of existing transactions");
        let html = self.fetch_transactions_page(None)?;
        Ok(page::note_checksums(&html))
    }
}

impl PortfolioConnector for WallMineConnector {
    type PositionId = String;

    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn resolve_position_id(
        &mut self,
        ticker: &TickerRef,
    ) -> Result<Option<String>, ConnectorError> {
        info!("WallMine: resolving position id for {}", ticker.symbol());
        let html = self.fetch_transactions_page(Some(ticker.symbol()))?;
        let position_id = page::add_transaction_url(&html, ticker.symbol())
            .and_then(|url| page::position_id_from_url(&url));
        if position_id.is_none() {
            info!("WallMine: no position for {} in portfolio {}", ticker.symbol(), self.portfolio_id);
        }
        Ok(position_id)
    }

    fn create_position(&mut self, ticker: &TickerRef) -> Result<(), ConnectorError> {
        info!("WallMine: creating position for {ticker}");
        let client = self.session()?;

        // The creation form wants a token freshly harvested from the
        // portfolio page.
        let portfolio_url = format!("{BASE_URL}/portfolios/{}", self.portfolio_id);
        let portfolio_page = client.get(&portfolio_url).send()?.text()?;
        let token = page::csrf_token(&portfolio_page).ok_or_else(|| {
            ConnectorError::unexpected(PROVIDER_ID, "portfolio page carries no csrf-token")
        })?;

        let symbol = ticker.unique_symbol();
        let form = [
            ("utf8", "\u{2713}"),
            ("portfolio_item[symbol]", symbol.as_str()),
            ("authenticity_token", token.as_str()),
        ];
        let response = client
            .post(format!("{BASE_URL}/portfolios/{}/item", self.portfolio_id))
            .form(&form)
            .send()?;

        // A rejected symbol renders back into the page rather than
        // failing the request, so the body has to be inspected too.
        let status = response.status();
        let body = response.text()?;
        let not_found_marker = format!("Symbol {symbol} not found, please try again");
        if !status.is_success() || body.contains(&not_found_marker) {
            warn!(
                "WallMine: could not create position for {ticker}; try adding the ticker \
                 manually in WallMine to check whether it is recognized, and on which exchange"
            );
        }
        Ok(())
    }

    fn add_trade(
        &mut self,
        position_id: &String,
        trade: &Trade,
        skip_duplicate: bool,
    ) -> Result<(), ConnectorError> {
        let date = trade.date.format("%Y-%m-%d").to_string();
        let checksum = checksum::trade_checksum(
            position_id,
            trade.side.as_str(),
            &date,
            trade.shares,
            trade.price,
        );
        let marker = checksum.to_string();

        if skip_duplicate {
            if self.known_checksums.is_none() {
                let known = self.existing_transactions()?;
                self.known_checksums = Some(known);
            }
            if self
                .known_checksums
                .as_deref()
                .is_some_and(|known| known.contains(&marker))
            {
                warn!(
                    "WallMine: transaction {position_id}:{}:{date}:{}:{} already exists, skipping",
                    trade.side.as_str(),
                    trade.shares,
                    trade.price
                );
                return Ok(());
            }
        }

        // Fresh anti-forgery token for the submission.
        let html = self.fetch_transactions_page(None)?;
        let token = page::csrf_token(&html).ok_or_else(|| {
            ConnectorError::unexpected(PROVIDER_ID, "transactions page carries no csrf-token")
        })?;

        let shares = trade.shares.to_string();
        let price = trade.price.to_string();
        let notes = format!("{}\n#{marker}#", trade.note.as_deref().unwrap_or(""));
        let form = [
            ("authenticity_token", token.as_str()),
            ("portfolio_transaction[transaction_type]", trade.side.as_str()),
            ("portfolio_transaction[date]", date.as_str()),
            ("portfolio_transaction[shares]", shares.as_str()),
            ("portfolio_transaction[price]", price.as_str()),
            ("portfolio_transaction[commission]", "0.00"),
            ("portfolio_transaction[notes]", notes.as_str()),
            ("utf8", "\u{2713}"),
            ("_method", ""),
            ("button", ""),
        ];

        let client = self.session()?;
        let response = client
            .post(format!(
                "{BASE_URL}/portfolios/{}/item/{position_id}/transaction",
                self.portfolio_id
            ))
            .form(&form)
            .send()?;
        if !response.status().is_success() {
            warn!(
                "WallMine: could not add transaction {position_id}:{}:{date}:{shares}:{price}: HTTP {}",
                trade.side.as_str(),
                response.status()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeSide;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn trade_fixture() -> Trade {
        Trade::new(
            TradeSide::Buy,
            NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
            10,
            dec!(150.00),
        )
    }

    /// Render the transactions table the way WallMine would after a
    /// submission whose note carried the given text.
    fn transactions_page_with_note(note: &str) -> String {
        format!(
            r#"<html><head><meta name="csrf-token" content="t0k3n==" /></head>
            <body><table>
              <tr class="js-transaction-1"><td class="notes-column">{note}</td></tr>
            </table></body></html>"#
        )
    }

    #[test]
    fn test_submitted_marker_round_trips_through_scraping() {
        // The checksum embedded at submission time must be recoverable
        // from the rendered notes column, or dedup silently stops
        // working.
        let trade = trade_fixture();
        let date = trade.date.format("%Y-%m-%d").to_string();
        let checksum =
            checksum::trade_checksum("4711", trade.side.as_str(), &date, trade.shares, trade.price);

        let notes = format!("{}\n#{checksum}#", "ISK depot");
        let html = transactions_page_with_note(&notes);
        assert_eq!(page::note_checksums(&html), vec![checksum.to_string()]);
    }

    #[test]
    fn test_duplicate_detected_regardless_of_note_text() {
        // Same five identifying fields, different note: the scraped
        // marker still equals the freshly computed checksum.
        let trade = trade_fixture();
        let date = trade.date.format("%Y-%m-%d").to_string();
        let first =
            checksum::trade_checksum("4711", trade.side.as_str(), &date, trade.shares, trade.price);

        let html = transactions_page_with_note(&format!("first import\n#{first}#"));
        let known = page::note_checksums(&html);

        let resubmitted = trade_fixture().with_note("second import, different note");
        let resubmitted_date = resubmitted.date.format("%Y-%m-%d").to_string();
        let second = checksum::trade_checksum(
            "4711",
            resubmitted.side.as_str(),
            &resubmitted_date,
            resubmitted.shares,
            resubmitted.price,
        );
        assert!(known.contains(&second.to_string()));
    }

    #[test]
    fn test_changed_field_is_not_a_duplicate() {
        let trade = trade_fixture();
        let date = trade.date.format("%Y-%m-%d").to_string();
        let first =
            checksum::trade_checksum("4711", trade.side.as_str(), &date, trade.shares, trade.price);
        let html = transactions_page_with_note(&format!("\n#{first}#"));
        let known = page::note_checksums(&html);

        let different_shares =
            checksum::trade_checksum("4711", trade.side.as_str(), &date, 11, trade.price);
        assert!(!known.contains(&different_shares.to_string()));
    }
}
