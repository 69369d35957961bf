//! Process-wide application state, built once at startup.
//!
//! Request handlers receive `&AppContext` and only read from it; the catalog
//! and the cache configuration never change after [`AppContext::init`].

use tracing::info;

use crate::{
    cache::StockCache,
    catalog::SymbolCatalog,
    config::Config,
    errors::Error,
    models::{period::Period, stock_series::StockSeries, ticker::Ticker},
    providers::{HistoryProvider, build_provider},
    utils::paths::ensure_cache_dir,
};

pub struct AppContext<P = Box<dyn HistoryProvider>> {
    pub catalog: SymbolCatalog,
    pub cache: StockCache<P>,
    pub default_period: Period,
}

impl AppContext {
    /// Loads the catalog, ensures the cache directory exists and builds the
    /// configured provider.
    ///
    /// A missing catalog is fatal: there is nothing to offer without it.
    pub fn init(config: &Config) -> Result<Self, Error> {
        let provider = build_provider(&config.provider)?;
        Self::with_provider(config, provider)
    }
}

impl<P: HistoryProvider> AppContext<P> {
    /// Same as [`AppContext::init`] with an explicit provider.
    pub fn with_provider(config: &Config, provider: P) -> Result<Self, Error> {
        let catalog = SymbolCatalog::load(&config.catalog_path)?;
        let cache_dir = ensure_cache_dir(&config.cache_dir)?;
        let cache = StockCache::new(provider, cache_dir)?
            .with_exchange_suffix(config.exchange_suffix.clone())
            .with_policy(config.cache_policy());

        info!(
            symbols = catalog.len(),
            cache_dir = %cache.cache_dir().display(),
            period = %config.period,
            "application context ready"
        );

        Ok(Self {
            catalog,
            cache,
            default_period: config.period.clone(),
        })
    }

    /// The series for `symbol` over the configured default period.
    pub async fn series(&self, symbol: &str) -> Result<StockSeries, Error> {
        let ticker = Ticker::new(symbol)?;
        self.cache.fetch(&ticker, &self.default_period).await
    }
}
