//! Provider abstraction for remote daily-history sources.
//!
//! This module defines the [`HistoryProvider`] trait, the single seam between the
//! cache and whatever market-data vendor backs it. A provider is treated as a
//! black box: it is asked for `(symbol, period)` and answers with a
//! [`StockSeries`] or an error. No retry or backoff happens at this layer.
//!
//! The trait is async and object safe, so providers can be chosen at runtime
//! through [`build_provider`].
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use stock_cache::models::{request_params::HistoryRequest, stock_series::StockSeries};
//! use stock_cache::providers::{HistoryProvider, ProviderError};
//!
//! struct NoData;
//!
//! #[async_trait]
//! impl HistoryProvider for NoData {
//!     async fn history(&self, request: HistoryRequest) -> Result<StockSeries, ProviderError> {
//!         Ok(StockSeries::empty(request.symbol))
//!     }
//! }
//! ```

pub mod yahoo;

use std::sync::Arc;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::{
    config::{ProviderConfig, ProviderId},
    models::{request_params::HistoryRequest, stock_series::StockSeries},
};

/// Trait for fetching a daily OHLC history from a market data provider.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetches the daily history for `request.symbol` over `request.period`.
    ///
    /// An unknown symbol may legitimately come back as an empty series; it is
    /// up to the implementation whether that is an error.
    async fn history(&self, request: HistoryRequest) -> Result<StockSeries, ProviderError>;
}

#[async_trait]
impl<T: HistoryProvider + ?Sized> HistoryProvider for &T {
    async fn history(&self, request: HistoryRequest) -> Result<StockSeries, ProviderError> {
        (**self).history(request).await
    }
}

#[async_trait]
impl<T: HistoryProvider + ?Sized> HistoryProvider for Box<T> {
    async fn history(&self, request: HistoryRequest) -> Result<StockSeries, ProviderError> {
        (**self).history(request).await
    }
}

#[async_trait]
impl<T: HistoryProvider + ?Sized> HistoryProvider for Arc<T> {
    async fn history(&self, request: HistoryRequest) -> Result<StockSeries, ProviderError> {
        (**self).history(request).await
    }
}

/// Build and return a boxed provider for the configured [`ProviderId`].
pub fn build_provider(
    cfg: &ProviderConfig,
) -> Result<Box<dyn HistoryProvider>, ProviderInitError> {
    match cfg.kind {
        ProviderId::Yahoo => Ok(Box::new(yahoo::YahooProvider::new(cfg)?)),
    }
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The configured user agent contains invalid characters.
    #[snafu(display("Invalid user agent: {source}"))]
    InvalidUserAgent {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// The configured base URL does not parse.
    #[snafu(display("Invalid base URL '{url}': {source}"))]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `HistoryProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error message or a non-success status.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body could not be decoded into a history.
    #[snafu(display("Malformed provider response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal {
        message: String,
        backtrace: Backtrace,
    },
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{observation::Observation, period::Period};

    struct OneBar;
    struct Failing;

    #[async_trait]
    impl HistoryProvider for OneBar {
        async fn history(&self, request: HistoryRequest) -> Result<StockSeries, ProviderError> {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok(StockSeries::new(
                request.symbol,
                vec![Observation::new(date, 1.0, 2.0, 0.5, 1.5)],
            ))
        }
    }

    #[async_trait]
    impl HistoryProvider for Failing {
        async fn history(&self, _request: HistoryRequest) -> Result<StockSeries, ProviderError> {
            ApiSnafu {
                message: "quota exhausted",
            }
            .fail()
        }
    }

    // Picked at runtime, so it has to go through a trait object.
    fn get_provider(name: &str) -> Box<dyn HistoryProvider> {
        if name == "one" {
            Box::new(OneBar)
        } else {
            Box::new(Failing)
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let provider = get_provider("one");
        let series = provider
            .history(HistoryRequest::new("ACME.NS", Period::one_day()))
            .await
            .unwrap();
        assert_eq!(series.symbol, "ACME.NS");
        assert_eq!(series.len(), 1);

        let err = get_provider("other")
            .history(HistoryRequest::new("ACME.NS", Period::one_day()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exhausted"));
    }
}
