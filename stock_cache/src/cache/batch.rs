use indexmap::IndexMap;
use tracing::{info, warn};

use crate::{
    cache::StockCache,
    errors::Error,
    models::{period::Period, stock_series::StockSeries, ticker::Ticker},
    providers::HistoryProvider,
};

/// Per-symbol outcome of [`StockCache::fetch_many`], keyed by qualified symbol
/// in request order.
pub type BatchResults = IndexMap<String, Result<StockSeries, Error>>;

/// Success/failure counts of a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl<P: HistoryProvider> StockCache<P> {
    /// Runs [`fetch`](Self::fetch) for every ticker, one after the other.
    ///
    /// A failing symbol is recorded and the batch moves on. Tickers that
    /// qualify to the same symbol are fetched once.
    pub async fn fetch_many<'a, I>(&self, tickers: I, period: &Period) -> BatchResults
    where
        I: IntoIterator<Item = &'a Ticker>,
    {
        let mut results = BatchResults::new();
        for ticker in tickers {
            let symbol = self.qualify(ticker);
            if results.contains_key(&symbol) {
                continue;
            }
            let outcome = self.fetch(ticker, period).await;
            if let Err(e) = &outcome {
                warn!(%symbol, error = %e, "batch item failed");
            }
            results.insert(symbol, outcome);
        }

        let summary = summarize(&results);
        info!(succeeded = summary.succeeded, failed = summary.failed, "batch finished");
        results
    }
}

pub fn summarize(results: &BatchResults) -> BatchSummary {
    results
        .values()
        .fold(BatchSummary::default(), |mut acc, r| {
            match r {
                Ok(_) => acc.succeeded += 1,
                Err(_) => acc.failed += 1,
            }
            acc
        })
}
