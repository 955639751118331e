//! Portfolio service connectors.
//!
//! This module contains:
//! - The `PortfolioConnector` trait both connectors implement
//! - The SimplyWall.st connector (OAuth + JSON API)
//! - The WallMine connector (form submission over a scraped HTML session)
//!
//! Connectors do not interact with each other; a caller iterating trade
//! records drives each one independently.

mod traits;

pub mod simplywallst;
pub mod wallmine;

pub use simplywallst::SimplyWallStConnector;
pub use traits::PortfolioConnector;
pub use wallmine::WallMineConnector;
