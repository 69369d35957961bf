//! A collection of daily observations for a single ticker.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::observation::Observation;

/// Represents a complete daily history for a single symbol.
///
/// Groups the [`Observation`]s with the symbol they belong to, making the
/// data set self-describing. A series is a plain value: once handed to a
/// caller nothing in this crate mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSeries {
    /// The exchange-qualified symbol this data represents (e.g. "RELIANCE.NS").
    pub symbol: String,
    /// Observations in the order they were produced (ascending dates for well-formed data).
    pub observations: Vec<Observation>,
}

/// A broken ordering or price invariant found by [`StockSeries::violations`].
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// The date at `index` is not strictly after the previous one.
    OutOfOrder { index: usize, date: NaiveDate },
    /// The date at `index` already appeared earlier in the series.
    DuplicateDate { index: usize, date: NaiveDate },
    /// `low <= open, close <= high` does not hold for the row at `index`.
    PriceRange { index: usize, date: NaiveDate },
}

impl StockSeries {
    pub fn new(symbol: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            symbol: symbol.into(),
            observations,
        }
    }

    /// An empty series, as produced by a provider that has no data for `symbol`.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Closing prices in series order.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.close)
    }

    /// Lists every row that breaks the date ordering or OHLC range invariants.
    ///
    /// Nothing is rejected or repaired: sources are not required to honour the
    /// invariants, and callers decide what to do with the report.
    pub fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        let mut prev: Option<NaiveDate> = None;
        let mut seen = std::collections::HashSet::with_capacity(self.observations.len());

        for (index, obs) in self.observations.iter().enumerate() {
            let date = obs.date;
            if !seen.insert(date) {
                out.push(Violation::DuplicateDate { index, date });
            } else if prev.is_some_and(|p| date <= p) {
                out.push(Violation::OutOfOrder { index, date });
            }
            if !obs.is_consistent() {
                out.push(Violation::PriceRange { index, date });
            }
            prev = Some(date);
        }

        out
    }
}
