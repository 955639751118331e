//! Core data types shared by both connectors
//!
//! - `credentials` - account credentials supplied at construction
//! - `ticker` - exchange/ticker pair and its composite key
//! - `trade` - trade side and the trade record submitted to a service

mod credentials;
mod ticker;
mod trade;

pub use credentials::Credentials;
pub use ticker::TickerRef;
pub use trade::{Trade, TradeSide};
