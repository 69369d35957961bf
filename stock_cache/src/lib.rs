//! Local CSV cache for daily stock histories.
//!
//! [`cache::StockCache::fetch`] serves a symbol's daily OHLC series from a
//! per-symbol snapshot file when one exists and otherwise downloads it from a
//! [`providers::HistoryProvider`], persists it, and returns what was persisted.
//! [`catalog::SymbolCatalog`] holds the fixed list of selectable tickers and
//! [`context::AppContext`] wires both together from a [`config::Config`].

pub mod cache;
pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod io;
pub mod models;
pub mod providers;
pub mod utils;

pub use cache::{CachePolicy, StockCache, fetch};
pub use errors::Error;
