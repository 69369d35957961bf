use serde::{Deserialize, Serialize};

use crate::models::request_params::HistoryRequest;

/// Bar width requested from the chart endpoint. The cache only stores daily bars.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneDay => "1d",
        }
    }
}

/// Yahoo-specific query options for a chart request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct YahooChartParams {
    pub interval: Interval,
    /// Include pre/post market prices (only meaningful for intraday intervals).
    #[serde(default)]
    pub include_pre_post: bool,
}

/// Builds the query string for one chart request.
///
/// The period token is forwarded as `range` without local validation.
pub fn construct_params(request: &HistoryRequest, extra: &YahooChartParams) -> Vec<(String, String)> {
    vec![
        ("range".to_string(), request.period.as_str().to_string()),
        ("interval".to_string(), extra.interval.as_str().to_string()),
        ("includePrePost".to_string(), extra.include_pre_post.to_string()),
    ]
}
