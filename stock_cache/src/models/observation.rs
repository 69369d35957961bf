//! Canonical in-memory representation of one trading day (OHLC + optional volume).
//!
//! This struct is the row type of every [`StockSeries`](crate::models::stock_series::StockSeries),
//! whether it was read from a snapshot on disk or returned by a
//! [`HistoryProvider`](crate::providers::HistoryProvider).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily observation for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// The trading date (exchange calendar date, no time component).
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price of the day.
    pub high: f64,

    /// Lowest price of the day.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the day. Not every source supplies it.
    pub volume: Option<f64>,
}

impl Observation {
    /// Builds an observation without volume.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Returns a copy carrying the given volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// `true` when `low <= open, close <= high`.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.high
            && (self.low..=self.high).contains(&self.open)
            && (self.low..=self.high).contains(&self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn consistent_bar() {
        assert!(Observation::new(day(1), 10.0, 11.0, 9.0, 10.5).is_consistent());
    }

    #[test]
    fn close_above_high_is_inconsistent() {
        assert!(!Observation::new(day(1), 10.0, 11.0, 9.0, 11.5).is_consistent());
    }

    #[test]
    fn inverted_range_is_inconsistent() {
        assert!(!Observation::new(day(1), 10.0, 9.0, 11.0, 10.0).is_consistent());
    }
}
