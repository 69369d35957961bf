use serde::{Deserialize, Serialize};

use crate::models::period::Period;

/// Parameters for one history request to a [`HistoryProvider`](crate::providers::HistoryProvider).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// The exchange-qualified symbol, forwarded verbatim (e.g. `"RELIANCE.NS"`).
    pub symbol: String,

    /// The history window, forwarded verbatim.
    pub period: Period,
}

impl HistoryRequest {
    pub fn new(symbol: impl Into<String>, period: Period) -> Self {
        Self {
            symbol: symbol.into(),
            period,
        }
    }
}
