//! Exchange/ticker reference.

use std::fmt;

/// A (exchange, ticker) pair identifying a listed security.
///
/// Both parts are normalized to uppercase on construction. Services key
/// their positions on the composite `EXCHANGE:TICKER` form returned by
/// [`unique_symbol`](Self::unique_symbol), e.g. `"NYSE:IBM"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickerRef {
    exchange: String,
    symbol: String,
}

impl TickerRef {
    /// Create a ticker reference, uppercasing both parts.
    pub fn new(exchange: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into().to_uppercase(),
            symbol: symbol.into().to_uppercase(),
        }
    }

    /// The exchange code (e.g. "NYSE").
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// The ticker symbol (e.g. "IBM").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The composite `EXCHANGE:TICKER` key the services match on.
    pub fn unique_symbol(&self) -> String {
        format!("{}:{}", self.exchange, self.symbol)
    }
}

impl fmt::Display for TickerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.exchange, self.symbol)
    }
}
