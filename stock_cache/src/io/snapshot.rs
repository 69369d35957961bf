//! CSV snapshot files.
//!
//! One file per symbol, header `Date,Open,High,Low,Close,Volume`, one row per
//! trading day. [`write_snapshot`] and [`read_snapshot`] are the only code that
//! touches this format, so a value returned after a write is exactly what a
//! later read produces.
//!
//! Reading is lenient about what older writers produced: the `Volume` column
//! may be missing, extra columns (dividends, splits) are ignored, and a `Date`
//! cell with a time and offset suffix is read by its leading calendar date.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de};
use snafu::{Backtrace, ResultExt, Snafu};
use tempfile::NamedTempFile;

use crate::models::{observation::Observation, stock_series::StockSeries};

/// Column order of every snapshot this crate writes.
pub const HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SnapshotError {
    /// The snapshot file could not be opened for reading.
    #[snafu(display("Failed to open {}: {source}", path.display()))]
    Open {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A row did not parse (bad date, non-numeric price, missing column).
    #[snafu(display("Failed to parse {}: {source}", path.display()))]
    Parse {
        path: PathBuf,
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// The temporary file next to the destination could not be created or written.
    #[snafu(display("Failed to write into {}: {source}", path.display()))]
    Create {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A CSV record could not be encoded.
    #[snafu(display("Failed to encode {}: {source}", path.display()))]
    Encode {
        path: PathBuf,
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// The finished temporary file could not be moved over the destination.
    #[snafu(display("Failed to replace {}: {source}", path.display()))]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
        backtrace: Backtrace,
    },

    /// A JSON document could not be encoded.
    #[snafu(display("Failed to encode JSON for {}: {source}", path.display()))]
    Json {
        path: PathBuf,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "Date", deserialize_with = "leading_date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

impl From<SnapshotRow> for Observation {
    fn from(row: SnapshotRow) -> Self {
        Observation {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

fn leading_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, DATE_FORMAT)
        .map_err(|e| de::Error::custom(format!("invalid date '{raw}': {e}")))
}

/// Reads the snapshot at `path` as the series for `symbol`.
///
/// An empty or header-only file is an empty series.
pub fn read_snapshot(path: &Path, symbol: &str) -> Result<StockSeries, SnapshotError> {
    let file = File::open(path).context(OpenSnafu { path })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let observations = reader
        .deserialize::<SnapshotRow>()
        .map(|row| row.map(Observation::from))
        .collect::<Result<Vec<_>, _>>()
        .context(ParseSnafu { path })?;

    Ok(StockSeries::new(symbol, observations))
}

/// Writes `series` to `path`, replacing any existing file.
///
/// The rows go to a temporary file in the destination directory which is then
/// renamed over `path`, so readers never observe a half-written snapshot. The
/// directory must already exist; it is never created here.
pub fn write_snapshot(path: &Path, series: &StockSeries) -> Result<(), SnapshotError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).context(CreateSnafu { path: dir })?;

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        writer.write_record(HEADER).context(EncodeSnafu { path })?;
        for obs in &series.observations {
            writer
                .write_record([
                    obs.date.format(DATE_FORMAT).to_string(),
                    obs.open.to_string(),
                    obs.high.to_string(),
                    obs.low.to_string(),
                    obs.close.to_string(),
                    obs.volume.map(|v| v.to_string()).unwrap_or_default(),
                ])
                .context(EncodeSnafu { path })?;
        }
        writer.flush().context(CreateSnafu { path })?;
    }
    tmp.as_file_mut().flush().context(CreateSnafu { path })?;
    tmp.as_file().sync_all().context(CreateSnafu { path })?;

    tmp.persist(path).context(PersistSnafu { path })?;
    Ok(())
}
