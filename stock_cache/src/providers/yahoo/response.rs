use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::models::{observation::Observation, stock_series::StockSeries};

/// The chart error code Yahoo uses for unknown or delisted symbols.
pub const NOT_FOUND_CODE: &str = "Not Found";

#[derive(Deserialize, Debug)]
pub struct YahooChartResponse {
    pub chart: YahooChart,
}

#[derive(Deserialize, Debug)]
pub struct YahooChart {
    #[serde(default)]
    pub result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    pub error: Option<YahooChartError>,
}

#[derive(Deserialize, Debug)]
pub struct YahooChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct YahooChartResult {
    #[serde(default)]
    pub meta: YahooMeta,
    /// Absent when the range holds no bars.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: YahooIndicators,
}

#[derive(Deserialize, Debug, Default)]
pub struct YahooMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Exchange offset from UTC in seconds, used to pick the trading date.
    #[serde(default, rename = "gmtoffset")]
    pub gmt_offset: i64,
}

#[derive(Deserialize, Debug)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooQuote>,
}

#[derive(Deserialize, Debug, Default)]
pub struct YahooQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl YahooChartError {
    pub fn is_not_found(&self) -> bool {
        self.code == NOT_FOUND_CODE
    }

    pub fn message(&self) -> String {
        match &self.description {
            Some(d) => format!("{}: {}", self.code, d),
            None => self.code.clone(),
        }
    }
}

impl YahooChartResult {
    /// Converts the column-oriented chart payload into observations.
    ///
    /// Rows with any missing OHLC value (holidays, halted sessions) are skipped.
    pub fn into_series(self, symbol: &str) -> StockSeries {
        let Some(timestamps) = self.timestamp else {
            return StockSeries::empty(symbol);
        };
        let Some(quote) = self.indicators.quote.into_iter().next() else {
            return StockSeries::empty(symbol);
        };
        let offset = self.meta.gmt_offset;

        let observations = timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let date = trading_date(ts, offset)?;
                let open = quote.open.get(i).copied().flatten()?;
                let high = quote.high.get(i).copied().flatten()?;
                let low = quote.low.get(i).copied().flatten()?;
                let close = quote.close.get(i).copied().flatten()?;
                Some(Observation {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume: quote.volume.get(i).copied().flatten(),
                })
            })
            .collect();

        StockSeries::new(symbol, observations)
    }
}

fn trading_date(ts: i64, gmt_offset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts.checked_add(gmt_offset)?, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "INR", "symbol": "ACME.NS", "gmtoffset": 19800},
                "timestamp": [1704080700, 1704167100, 1704253500],
                "indicators": {"quote": [{
                    "open":   [10.0, null, 11.0],
                    "high":   [11.0, 12.0, 11.5],
                    "low":    [9.0, 10.0, 10.5],
                    "close":  [10.5, 11.0, 11.2],
                    "volume": [1000, 2000, null]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_rows_and_skips_incomplete_ones() {
        let resp: YahooChartResponse = serde_json::from_str(SAMPLE).unwrap();
        let result = resp.chart.result.unwrap().into_iter().next().unwrap();
        assert_eq!(result.meta.currency.as_deref(), Some("INR"));

        let series = result.into_series("ACME.NS");
        assert_eq!(series.symbol, "ACME.NS");
        assert_eq!(series.len(), 2);

        let first = &series.observations[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.volume, Some(1000.0));

        let last = &series.observations[1];
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(last.close, 11.2);
        assert_eq!(last.volume, None);
    }

    #[test]
    fn not_found_error_payload() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let resp: YahooChartResponse = serde_json::from_str(body).unwrap();
        assert!(resp.chart.result.is_none());
        let err = resp.chart.error.unwrap();
        assert!(err.is_not_found());
        assert!(err.message().contains("delisted"));
    }

    #[test]
    fn missing_timestamps_mean_no_rows() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let resp: YahooChartResponse = serde_json::from_str(body).unwrap();
        let series = resp.chart.result.unwrap().remove(0).into_series("X.NS");
        assert!(series.is_empty());
    }
}
