use std::path::PathBuf;

use shared_utils::env::MissingEnvVarError;
use thiserror::Error;

use crate::{
    io::snapshot::SnapshotError,
    models::{period::PeriodError, ticker::TickerError},
    providers::{ProviderError, ProviderInitError},
};

/// The unified error type for the `stock_cache` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The symbol catalog (CSV or spreadsheet) could not be opened or parsed.
    /// Fatal at startup.
    #[error("Symbol catalog unavailable at {}: {source}", path.display())]
    CatalogUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The catalog file has no `Symbol` column.
    #[error("Symbol catalog at {} has no '{column}' column", path.display())]
    CatalogMissingColumn { path: PathBuf, column: String },

    /// A spreadsheet column selection like `A:D` did not parse.
    #[error("Invalid column range '{0}'")]
    InvalidColumns(String),

    /// The remote provider failed (unknown symbol, network failure, quota...).
    #[error("Remote fetch failed for {symbol}: {source}")]
    RemoteFetchFailed {
        symbol: String,
        #[source]
        source: ProviderError,
    },

    /// A snapshot could not be written (missing cache directory, permissions...).
    #[error("Failed to write cache snapshot: {0}")]
    CacheWriteFailed(#[source] SnapshotError),

    /// A snapshot exists but could not be read back as a series.
    #[error("Cache snapshot is unreadable: {0}")]
    CacheCorrupt(#[source] SnapshotError),

    /// A JSON export could not be written.
    #[error("Export failed: {0}")]
    Export(#[source] SnapshotError),

    #[error("Invalid ticker: {0}")]
    InvalidTicker(#[from] TickerError),

    #[error("Invalid period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    MissingEnv(#[from] MissingEnvVarError),

    #[error("Provider initialization error: {0}")]
    ProviderInit(#[from] ProviderInitError),

    /// A generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
