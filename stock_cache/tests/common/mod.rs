#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

pub mod chart_server;

use async_trait::async_trait;
use chrono::NaiveDate;
use stock_cache::{
    models::{
        observation::Observation, request_params::HistoryRequest, stock_series::StockSeries,
    },
    providers::{ApiSnafu, HistoryProvider, ProviderError},
};

/// Answers from a fixed table and counts every call it receives.
///
/// Symbols missing from the table get an empty series; symbols listed in
/// `failing` get an API error.
#[derive(Default)]
pub struct ScriptedProvider {
    rows: HashMap<String, Vec<Observation>>,
    failing: Vec<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<HistoryRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, symbol: &str, rows: Vec<Observation>) -> Self {
        self.rows.insert(symbol.to_string(), rows);
        self
    }

    pub fn failing_for(mut self, symbol: &str) -> Self {
        self.failing.push(symbol.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HistoryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryProvider for ScriptedProvider {
    async fn history(&self, request: HistoryRequest) -> Result<StockSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if self.failing.contains(&request.symbol) {
            return ApiSnafu {
                message: format!("no data for {}", request.symbol),
            }
            .fail();
        }
        let rows = self.rows.get(&request.symbol).cloned().unwrap_or_default();
        Ok(StockSeries::new(request.symbol, rows))
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The three ACME rows used across the cache scenarios.
pub fn acme_rows() -> Vec<Observation> {
    vec![
        Observation::new(day(2024, 1, 1), 10.0, 11.0, 9.0, 10.5),
        Observation::new(day(2024, 1, 2), 10.5, 12.0, 10.0, 11.0),
        Observation::new(day(2024, 1, 3), 11.0, 11.5, 10.5, 11.2),
    ]
}
