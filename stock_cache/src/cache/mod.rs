//! Cache-or-fetch for daily stock series.
//!
//! A [`StockCache`] owns a provider and a cache directory holding one CSV
//! snapshot per exchange-qualified symbol. [`StockCache::fetch`] returns the
//! snapshot when it is valid and otherwise downloads, persists and re-reads it.
//!
//! Validity is file presence by default. A [`CachePolicy`] with a `max_age`
//! additionally treats snapshots older than that age as missing. There is no
//! locking: two first-time requests for the same symbol may both download,
//! and the last rename wins.

mod batch;

pub use batch::{BatchResults, BatchSummary, summarize};

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::{debug, error, info, warn};

use crate::{
    errors::Error,
    io::snapshot::{read_snapshot, write_snapshot},
    models::{
        period::Period, request_params::HistoryRequest, stock_series::StockSeries,
        ticker::{DEFAULT_EXCHANGE_SUFFIX, Ticker},
    },
    providers::HistoryProvider,
    utils::paths::make_abspath,
};

/// When an existing snapshot counts as a hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// `None`: any existing snapshot is valid forever.
    /// `Some(age)`: snapshots last modified longer ago than `age` are re-fetched.
    pub max_age: Option<Duration>,
}

impl CachePolicy {
    pub fn presence_only() -> Self {
        Self { max_age: None }
    }

    pub fn max_age(age: Duration) -> Self {
        Self { max_age: Some(age) }
    }
}

pub struct StockCache<P> {
    provider: P,
    cache_dir: PathBuf,
    exchange_suffix: String,
    policy: CachePolicy,
}

impl<P: HistoryProvider> StockCache<P> {
    /// Creates a cache rooted at `cache_dir` (resolved to an absolute path now).
    ///
    /// The directory is not created; call
    /// [`ensure_cache_dir`](crate::utils::paths::ensure_cache_dir) during setup.
    pub fn new(provider: P, cache_dir: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self {
            provider,
            cache_dir: make_abspath(cache_dir)?,
            exchange_suffix: DEFAULT_EXCHANGE_SUFFIX.to_string(),
            policy: CachePolicy::default(),
        })
    }

    /// Sets the suffix appended to bare symbols (`""` disables qualification).
    pub fn with_exchange_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exchange_suffix = suffix.into();
        self
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn exchange_suffix(&self) -> &str {
        &self.exchange_suffix
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The symbol string used both for the provider request and the file name.
    pub fn qualify(&self, ticker: &Ticker) -> String {
        ticker.qualified(&self.exchange_suffix)
    }

    pub fn snapshot_path(&self, ticker: &Ticker) -> PathBuf {
        self.cache_dir.join(self.qualify(ticker))
    }

    /// `true` if [`fetch`](Self::fetch) would be served from disk right now.
    pub fn is_cached(&self, ticker: &Ticker) -> Result<bool, Error> {
        self.is_valid(&self.snapshot_path(ticker))
    }

    /// Returns the series for `ticker` over `period`, from disk when a valid
    /// snapshot exists, otherwise from the provider.
    ///
    /// On a miss the provider's answer is written to the snapshot file and the
    /// file is read back, so the returned value is exactly what the next hit
    /// returns. An empty answer is persisted like any other.
    pub async fn fetch(&self, ticker: &Ticker, period: &Period) -> Result<StockSeries, Error> {
        let symbol = self.qualify(ticker);
        let path = self.cache_dir.join(&symbol);

        if self.is_valid(&path)? {
            debug!(%symbol, path = %path.display(), "cache hit");
            return read_snapshot(&path, &symbol).map_err(|e| {
                error!(%symbol, error = %e, "cached snapshot is unreadable");
                Error::CacheCorrupt(e)
            });
        }

        info!(%symbol, %period, "cache miss, downloading");
        let series = self
            .provider
            .history(HistoryRequest::new(symbol.clone(), period.clone()))
            .await
            .map_err(|source| {
                error!(%symbol, error = %source, "remote fetch failed");
                Error::RemoteFetchFailed {
                    symbol: symbol.clone(),
                    source,
                }
            })?;

        if series.is_empty() {
            warn!(%symbol, %period, "provider returned no rows; persisting an empty snapshot");
        }

        write_snapshot(&path, &series).map_err(|e| {
            error!(%symbol, error = %e, "failed to write snapshot");
            Error::CacheWriteFailed(e)
        })?;
        info!(%symbol, rows = series.len(), path = %path.display(), "snapshot written");

        read_snapshot(&path, &symbol).map_err(|e| {
            error!(%symbol, error = %e, "freshly written snapshot is unreadable");
            Error::CacheCorrupt(e)
        })
    }

    /// Deletes the snapshot for `ticker`. Returns `false` if there was none.
    pub fn evict(&self, ticker: &Ticker) -> Result<bool, Error> {
        let path = self.snapshot_path(ticker);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "snapshot evicted");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn is_valid(&self, path: &Path) -> Result<bool, Error> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let Some(max_age) = self.policy.max_age else {
            return Ok(true);
        };
        // A modification time in the future counts as fresh.
        let age = meta.modified()?.elapsed().unwrap_or_default();
        if age > max_age {
            debug!(path = %path.display(), age_secs = age.as_secs(), "snapshot expired");
            return Ok(false);
        }
        Ok(true)
    }
}

/// Single-shot cache-or-fetch with the default `.NS` suffix and presence-only validity.
///
/// `symbol` and `period` are validated only for emptiness (and, for the
/// symbol, for path separators since it names a file).
pub async fn fetch<P: HistoryProvider + ?Sized>(
    provider: &P,
    symbol: &str,
    period: &str,
    cache_dir: impl AsRef<Path>,
) -> Result<StockSeries, Error> {
    let ticker = Ticker::new(symbol)?;
    let period = Period::new(period)?;
    StockCache::new(provider, cache_dir)?
        .fetch(&ticker, &period)
        .await
}
