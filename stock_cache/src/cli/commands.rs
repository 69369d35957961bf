use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Cache-or-fetch daily stock histories")]
pub struct Cli {
    /// Path to the config file (stock_cache.toml). Falls back to $STOCK_CACHE_CONFIG.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the cache directory if it is missing
    Init,

    /// Pull the `Symbol` column out of a broker holdings spreadsheet into a catalog CSV
    Extract {
        /// Holdings export (.xlsx, .xls or .ods)
        #[arg(long, value_name = "FILE")]
        sheet: PathBuf,

        /// Rows above the header row (report title, dates)
        #[arg(long, default_value_t = 0)]
        skip_rows: usize,

        /// Restrict the header search to a column span (e.g. "A:D")
        #[arg(long)]
        columns: Option<String>,

        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Return one symbol's series, downloading it on first access
    Fetch {
        /// Ticker symbol, with or without the exchange suffix (e.g. "RELIANCE")
        #[arg(long)]
        symbol: String,

        /// History window token passed to the provider (e.g. "1y", "6mo")
        #[arg(long)]
        period: Option<String>,
    },

    /// Fetch several symbols; defaults to the whole catalog
    Batch {
        /// Comma-separated list of symbols (e.g. "TCS,INFY")
        #[arg(long)]
        symbols: Option<String>,

        #[arg(long)]
        period: Option<String>,

        /// Also export the successful series as one JSON file
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Print the symbol catalog
    Symbols,

    /// Write the catalog filtered to symbols the provider has data for
    Prune {
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Delete a cached snapshot
    Evict {
        #[arg(long)]
        symbol: String,
    },
}
