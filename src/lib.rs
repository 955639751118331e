//! Trades Connect
//!
//! This crate pushes brokerage trade records (buy/sell transactions of
//! stock tickers) into third-party portfolio-tracking services.
//!
//! # Overview
//!
//! Two structurally parallel connectors are provided:
//!
//! - [`SimplyWallStConnector`] - talks to the documented SimplyWall.st
//!   JSON API behind an OAuth password grant
//! - [`WallMineConnector`] - drives WallMine's HTML forms over an
//!   authenticated cookie session, since no public API exists
//!
//! Both implement the same contract ([`PortfolioConnector`]): resolve a
//! human-readable ticker to the service's internal position identifier
//! (creating the position if absent) and submit a transaction while
//! skipping duplicates. Sessions and the list of already-known
//! transactions are fetched lazily, once, and cached for the lifetime of
//! the connector instance.
//!
//! # Architecture
//!
//! ```text
//! +------------------+      +----------------------+
//! |   Trade record   | ---> |  PortfolioConnector  |  (shared contract)
//! +------------------+      +----------------------+
//!                              |                |
//!                              v                v
//!                   +----------------+  +----------------+
//!                   |  SimplyWall.st |  |    WallMine    |
//!                   |  (OAuth/JSON)  |  | (form scraping)|
//!                   +----------------+  +----------------+
//! ```
//!
//! All I/O is synchronous and blocking; a connector instance owns exactly
//! one session and one duplicate-detection cache and is not meant to be
//! shared across threads. Callers needing parallelism should construct
//! one instance per thread (each re-authenticates and re-fetches its own
//! cache independently).
//!
//! # Core Types
//!
//! - [`Credentials`] - email/password pair supplied at construction
//! - [`TickerRef`] - (exchange, ticker) pair, normalized to uppercase
//! - [`Trade`] - side, calendar date, share count, price, optional note
//! - [`TransactionRecord`] - a flattened SimplyWall.st transaction, the
//!   unit of structural duplicate detection

pub mod connector;
pub mod errors;
pub mod models;

// Re-export all public types from models
pub use models::{Credentials, TickerRef, Trade, TradeSide};

// Re-export connector types
pub use connector::simplywallst::{SimplyWallStConnector, TransactionRecord};
pub use connector::wallmine::WallMineConnector;
pub use connector::PortfolioConnector;

pub use errors::ConnectorError;
