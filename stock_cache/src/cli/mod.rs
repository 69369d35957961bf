//! The `stock-cache` command line.

pub mod commands;
pub mod params;

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{
    cache::summarize,
    catalog::SymbolCatalog,
    config::{Config, LogFormat, read_config, resolve_config_path},
    context::AppContext,
    errors::Error,
    io::json::write_json,
    models::ticker::Ticker,
    utils::paths::ensure_cache_dir,
};

use commands::{Cli, Commands};
use params::{parse_period, parse_symbols};

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays machine-readable.
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
    }
}

pub fn load_config(cli: &Cli) -> Result<Config, Error> {
    let path = resolve_config_path(cli.config.clone())?;
    read_config(path)
}

/// Executes one subcommand.
///
/// `init` and `extract` work before a catalog exists; every other command
/// builds the [`AppContext`] first.
pub async fn run(cli: Cli, config: Config) -> Result<(), Error> {
    match cli.command {
        Commands::Init => {
            let dir = ensure_cache_dir(&config.cache_dir)?;
            println!("{}", dir.display());
        }

        Commands::Extract {
            sheet,
            skip_rows,
            columns,
            out,
        } => {
            let catalog = SymbolCatalog::from_spreadsheet(&sheet, skip_rows, columns.as_deref())?;
            catalog.write(&out)?;
            eprintln!("SUMMARY: extracted {} symbols", catalog.len());
        }

        Commands::Fetch { symbol, period } => {
            let ctx = AppContext::init(&config)?;
            let ticker = Ticker::new(symbol)?;
            let period = parse_period(period.as_deref(), &ctx.default_period)?;
            let series = ctx.cache.fetch(&ticker, &period).await?;
            println!(
                "{}\t{}\t{}",
                series.symbol,
                series.len(),
                ctx.cache.snapshot_path(&ticker).display()
            );
        }

        Commands::Batch {
            symbols,
            period,
            json,
        } => {
            let ctx = AppContext::init(&config)?;
            let tickers = match symbols {
                Some(raw) => parse_symbols(&raw)?,
                None => ctx.catalog.symbols().to_vec(),
            };
            let period = parse_period(period.as_deref(), &ctx.default_period)?;
            let results = ctx.cache.fetch_many(&tickers, &period).await;

            for (symbol, result) in &results {
                match result {
                    Ok(series) => println!("{}\t{}", symbol, series.len()),
                    Err(e) => eprintln!("ERROR: {} - {}", symbol, e),
                }
            }

            if let Some(path) = json {
                write_json(&path, results.values().filter_map(|r| r.as_ref().ok()))
                    .map_err(Error::Export)?;
            }

            // Summary on stderr so it doesn't interfere with parsing stdout.
            let summary = summarize(&results);
            eprintln!(
                "SUMMARY: {} succeeded, {} failed",
                summary.succeeded, summary.failed
            );
        }

        Commands::Symbols => {
            let ctx = AppContext::init(&config)?;
            for ticker in &ctx.catalog {
                println!("{ticker}");
            }
        }

        Commands::Prune { out } => {
            let ctx = AppContext::init(&config)?;
            let pruned = ctx
                .catalog
                .prune_unlisted(ctx.cache.provider(), ctx.cache.exchange_suffix())
                .await;
            pruned.write(&out)?;
            eprintln!(
                "SUMMARY: kept {} of {} symbols",
                pruned.len(),
                ctx.catalog.len()
            );
        }

        Commands::Evict { symbol } => {
            let ctx = AppContext::init(&config)?;
            let ticker = Ticker::new(symbol)?;
            if !ctx.cache.evict(&ticker)? {
                warn!(symbol = %ticker, "no snapshot to evict");
            }
        }
    }

    Ok(())
}
