//! Yahoo Finance chart API provider.
//!
//! Daily bars come from `/v8/finance/chart/{symbol}?range={period}&interval=1d`.
//! The endpoint is unauthenticated; requests are spaced by a local rate limiter.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::YahooProvider;
