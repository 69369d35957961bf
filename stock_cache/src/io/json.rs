//! JSON export of several series at once.

use std::{fs::File, io::BufWriter, io::Write, path::Path};

use indexmap::IndexMap;
use snafu::ResultExt;

use crate::{
    io::snapshot::{CreateSnafu, JsonSnafu, SnapshotError},
    models::{observation::Observation, stock_series::StockSeries},
};

/// Writes `{ "<symbol>": [observation, ...], ... }` to `path`, keeping map order.
pub fn write_json<'a, I>(path: &Path, series: I) -> Result<(), SnapshotError>
where
    I: IntoIterator<Item = &'a StockSeries>,
{
    let doc: IndexMap<&str, &[Observation]> = series
        .into_iter()
        .map(|s| (s.symbol.as_str(), s.observations.as_slice()))
        .collect();

    let file = File::create(path).context(CreateSnafu { path })?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &doc).context(JsonSnafu { path })?;
    out.flush().context(CreateSnafu { path })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn exports_symbols_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stocks.json");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = StockSeries::new("B.NS", vec![Observation::new(date, 1.0, 2.0, 0.5, 1.5)]);
        let a = StockSeries::empty("A.NS");

        write_json(&path, [&b, &a]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.find("\"B.NS\"").unwrap() < text.find("\"A.NS\"").unwrap());

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["B.NS"][0]["date"], "2024-01-01");
        assert_eq!(obj["B.NS"][0]["close"], 1.5);
        assert!(obj["B.NS"][0]["volume"].is_null());
        assert_eq!(obj["A.NS"].as_array().unwrap().len(), 0);
    }
}
