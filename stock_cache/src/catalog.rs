//! The symbol catalog: the fixed, ordered list of tickers a front-end offers.
//!
//! Loaded once at startup from a CSV with a `Symbol` column and never
//! mutated afterwards. [`SymbolCatalog::prune_unlisted`] builds a *new*
//! catalog holding only the symbols the provider actually has data for, which
//! is how the shipped catalog files are produced.
//!
//! The first catalog usually comes out of a broker holdings export:
//! [`SymbolCatalog::from_spreadsheet`] reads the `Symbol` column of an Excel or
//! ODS sheet and [`SymbolCatalog::write`] turns it into the CSV form.

use std::{collections::HashSet, ops::RangeInclusive, path::Path};

use calamine::{Reader, open_workbook_auto};
use tracing::{debug, info, warn};

use crate::{
    errors::Error,
    models::{period::Period, request_params::HistoryRequest, ticker::Ticker},
    providers::HistoryProvider,
    utils::paths::make_abspath,
};

/// Header of the catalog column that lists tickers.
pub const SYMBOL_COLUMN: &str = "Symbol";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolCatalog {
    symbols: Vec<Ticker>,
}

impl SymbolCatalog {
    /// Builds a catalog, dropping repeated symbols while preserving first-seen order.
    pub fn new(symbols: impl IntoIterator<Item = Ticker>) -> Self {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .filter(|t| seen.insert(t.as_str().to_string()))
            .collect();
        Self { symbols }
    }

    /// Reads the `Symbol` column of the CSV at `path`.
    ///
    /// Other columns are ignored and blank cells skipped. A missing or
    /// unreadable file is [`Error::CatalogUnavailable`]: the caller has no
    /// symbol list to show and should stop rather than continue empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = make_abspath(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)
            .map_err(|source| Error::CatalogUnavailable {
                path: path.clone(),
                source: source.into(),
            })?;

        let headers = reader.headers().map_err(|source| Error::CatalogUnavailable {
            path: path.clone(),
            source: source.into(),
        })?;
        let column = headers
            .iter()
            .position(|h| h == SYMBOL_COLUMN)
            .ok_or_else(|| Error::CatalogMissingColumn {
                path: path.clone(),
                column: SYMBOL_COLUMN.to_string(),
            })?;

        let mut symbols = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| Error::CatalogUnavailable {
                path: path.clone(),
                source: source.into(),
            })?;
            let Some(cell) = record.get(column).filter(|c| !c.is_empty()) else {
                continue;
            };
            match Ticker::new(cell) {
                Ok(t) => symbols.push(t),
                Err(e) => warn!(symbol = cell, error = %e, "skipping catalog entry"),
            }
        }

        let catalog = Self::new(symbols);
        info!(path = %path.display(), symbols = catalog.len(), "symbol catalog loaded");
        Ok(catalog)
    }

    /// Reads the `Symbol` column from the first worksheet of an `.xlsx`,
    /// `.xls` or `.ods` file.
    ///
    /// The first `skip_rows` sheet rows (report titles, dates) are dropped and
    /// the next row is the header. `columns` limits the header search to an
    /// Excel-style span such as `"A:D"` or `"B"`.
    pub fn from_spreadsheet(
        path: impl AsRef<Path>,
        skip_rows: usize,
        columns: Option<&str>,
    ) -> Result<Self, Error> {
        let path = make_abspath(path)?;
        let wanted = columns.map(parse_column_span).transpose()?;
        let unavailable = |source: calamine::Error| Error::CatalogUnavailable {
            path: path.clone(),
            source: source.into(),
        };
        let missing_column = || Error::CatalogMissingColumn {
            path: path.clone(),
            column: SYMBOL_COLUMN.to_string(),
        };

        let mut workbook = open_workbook_auto(&path).map_err(unavailable)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(missing_column)?
            .map_err(unavailable)?;

        // Range coordinates are relative to the first used cell.
        let (first_row, first_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or_default();
        let mut rows = range
            .rows()
            .enumerate()
            .filter(|(i, _)| first_row + i >= skip_rows)
            .map(|(_, row)| row);

        let header = rows.next().ok_or_else(missing_column)?;
        let column = header
            .iter()
            .enumerate()
            .filter(|(j, _)| wanted.as_ref().is_none_or(|w| w.contains(&(first_col + j))))
            .find(|(_, cell)| cell.to_string().trim() == SYMBOL_COLUMN)
            .map(|(j, _)| j)
            .ok_or_else(missing_column)?;

        let mut symbols = Vec::new();
        for row in rows {
            let Some(cell) = row.get(column) else {
                continue;
            };
            let cell = cell.to_string();
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match Ticker::new(cell) {
                Ok(t) => symbols.push(t),
                Err(e) => warn!(symbol = cell, error = %e, "skipping spreadsheet entry"),
            }
        }

        let catalog = Self::new(symbols);
        info!(path = %path.display(), symbols = catalog.len(), "symbols extracted from spreadsheet");
        Ok(catalog)
    }

    /// Writes the catalog as a one-column `Symbol` CSV.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let as_io = |e: csv::Error| Error::Io(e.into());
        let mut writer = csv::Writer::from_path(path).map_err(as_io)?;
        writer.write_record([SYMBOL_COLUMN]).map_err(as_io)?;
        for symbol in &self.symbols {
            writer.write_record([symbol.as_str()]).map_err(as_io)?;
        }
        writer.flush()?;
        info!(path = %path.display(), symbols = self.len(), "symbol catalog written");
        Ok(())
    }

    pub fn symbols(&self) -> &[Ticker] {
        &self.symbols
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticker> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|t| t.as_str() == symbol)
    }

    /// Returns a catalog of the symbols for which `provider` has at least one
    /// daily row on the exchange named by `suffix`.
    ///
    /// Each symbol is probed with a one-day history request. Provider errors
    /// count as "not listed" and are logged.
    pub async fn prune_unlisted<P>(&self, provider: &P, suffix: &str) -> SymbolCatalog
    where
        P: HistoryProvider + ?Sized,
    {
        let mut listed = Vec::with_capacity(self.symbols.len());
        for ticker in &self.symbols {
            let symbol = ticker.qualified(suffix);
            match provider
                .history(HistoryRequest::new(symbol.clone(), Period::one_day()))
                .await
            {
                Ok(series) if !series.is_empty() => {
                    debug!(%symbol, "listed");
                    listed.push(ticker.clone());
                }
                Ok(_) => warn!(%symbol, "not listed on exchange, dropping"),
                Err(e) => warn!(%symbol, error = %e, "probe failed, dropping"),
            }
        }
        info!(kept = listed.len(), dropped = self.len() - listed.len(), "catalog pruned");
        SymbolCatalog { symbols: listed }
    }
}

/// Parses `"B"` or `"A:D"` into zero-based column indices.
fn parse_column_span(spec: &str) -> Result<RangeInclusive<usize>, Error> {
    let invalid = || Error::InvalidColumns(spec.to_string());
    let (start, end) = match spec.split_once(':') {
        Some((a, b)) => (a, b),
        None => (spec, spec),
    };
    let start = column_index(start).ok_or_else(invalid)?;
    let end = column_index(end).ok_or_else(invalid)?;
    if start > end {
        return Err(invalid());
    }
    Ok(start..=end)
}

fn column_index(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let n = letters
        .chars()
        .map(|c| (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize)
        .try_fold(0usize, |acc, d| acc.checked_mul(26)?.checked_add(d))?;
    Some(n - 1)
}

impl<'a> IntoIterator for &'a SymbolCatalog {
    type Item = &'a Ticker;
    type IntoIter = std::slice::Iter<'a, Ticker>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
