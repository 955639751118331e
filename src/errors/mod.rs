//! Error types for the connector crate.

use thiserror::Error;

/// Errors that can occur while talking to a portfolio service.
///
/// Most degraded conditions are deliberately not errors: failed logins,
/// rejected submissions, and not-found lookups are logged and surfaced as
/// `Ok` values (see the connector docs). The variants here are the fatal
/// conditions a caller cannot sensibly continue past.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// More than one position in the portfolio matched the same
    /// `EXCHANGE:TICKER` key. This is a data-integrity violation on the
    /// remote side, not a recoverable condition.
    #[error("Multiple positions matching {symbol} in portfolio {portfolio_id}")]
    AmbiguousPosition {
        /// The composite `EXCHANGE:TICKER` key that matched more than once
        symbol: String,
        /// The portfolio the duplicate positions live in
        portfolio_id: String,
    },

    /// The service returned a body that does not carry what the protocol
    /// requires (a token endpoint without tokens, a page without its
    /// anti-forgery token). Retrying will not help.
    #[error("Unexpected response from {provider}: {message}")]
    UnexpectedResponse {
        /// The connector that received the response
        provider: String,
        /// Description of what was missing or malformed
        message: String,
    },

    /// A transport-level error occurred while communicating with the
    /// service.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ConnectorError {
    /// Shorthand for [`ConnectorError::UnexpectedResponse`].
    pub(crate) fn unexpected(provider: &str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
