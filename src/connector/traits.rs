//! Connector trait definition.
//!
//! The trait captures the contract shared by both services: resolve a
//! ticker to the service's internal position identifier, create the
//! position when it is missing, and submit a trade with duplicate
//! protection. Listing existing transactions stays inherent on each
//! connector because the fingerprint types differ (full structural
//! records for SimplyWall.st, embedded checksums for WallMine).

use std::fmt;

use crate::errors::ConnectorError;
use crate::models::{TickerRef, Trade};

/// Contract for pushing trade records into one portfolio service.
///
/// Methods take `&mut self`: each connector lazily authenticates on
/// first need and lazily fetches its duplicate-detection cache, both
/// one-way transitions scoped to the instance. Instances are not meant
/// to be shared across threads; construct one per thread instead.
pub trait PortfolioConnector {
    /// The service's opaque position identifier (an integer id for
    /// SimplyWall.st, a string captured out of markup for WallMine).
    type PositionId: Clone + fmt::Debug;

    /// Unique identifier for this connector, used in logs.
    fn id(&self) -> &'static str;

    /// Look up the position identifier for a ticker in the configured
    /// portfolio.
    ///
    /// Returns `Ok(None)` when the portfolio or the position is absent;
    /// that is normal control flow, not an error. Fails with
    /// [`ConnectorError::AmbiguousPosition`] if the service holds more
    /// than one position for the same ticker.
    fn resolve_position_id(
        &mut self,
        ticker: &TickerRef,
    ) -> Result<Option<Self::PositionId>, ConnectorError>;

    /// Ask the service to create a position for a ticker.
    ///
    /// Does not return the new identifier; callers re-resolve after a
    /// successful creation. A rejected creation is logged as a warning
    /// and swallowed.
    fn create_position(&mut self, ticker: &TickerRef) -> Result<(), ConnectorError>;

    /// Submit a trade against a resolved position.
    ///
    /// With `skip_duplicate` set, the connector lazily fetches the
    /// service's existing transactions once and silently skips
    /// submission when an identical trade is already present. The cache
    /// is not refreshed after local additions, so the protection covers
    /// only transactions that predate this instance.
    fn add_trade(
        &mut self,
        position_id: &Self::PositionId,
        trade: &Trade,
        skip_duplicate: bool,
    ) -> Result<(), ConnectorError>;
}
