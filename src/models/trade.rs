//! Trade records submitted to a portfolio service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Direction of a trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Parse a broker-export side string.
    ///
    /// Anything that is not case-insensitively `BUY` is treated as a
    /// sell. This catch-all mirrors what the services were fed
    /// historically; it is an input-validation gap (a typo like "BYU"
    /// becomes a sell), kept until the looser inputs are confirmed gone.
    pub fn parse(side: &str) -> Self {
        if side.eq_ignore_ascii_case("BUY") {
            Self::Buy
        } else {
            Self::Sell
        }
    }

    /// The form value both services expect ("Buy" / "Sell").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

/// One trade record to push into a portfolio.
///
/// The date is a calendar day only; connectors discard any time-of-day
/// carried by the caller's source data before submission.
#[derive(Clone, Debug, PartialEq)]
pub struct Trade {
    /// Buy or sell.
    pub side: TradeSide,
    /// Calendar day of the trade.
    pub date: NaiveDate,
    /// Number of shares traded.
    pub shares: i64,
    /// Price per share.
    pub price: Decimal,
    /// Free-text note, carried only by services with a notes field.
    pub note: Option<String>,
}

impl Trade {
    /// Create a trade without a note.
    pub fn new(side: TradeSide, date: NaiveDate, shares: i64, price: Decimal) -> Self {
        Self {
            side,
            date,
            shares,
            price,
            note: None,
        }
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
