//! Exchange ticker symbols.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The National Stock Exchange of India suffix used by the default catalog.
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".NS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker symbol cannot be empty")]
    Empty,

    /// The symbol names a snapshot file, so it may not escape the cache directory.
    #[error("ticker symbol '{0}' is not usable as a file name")]
    NotAFileName(String),
}

/// A ticker symbol as typed by a user or read from the catalog (e.g. `RELIANCE`
/// or `RELIANCE.NS`).
///
/// No exchange validation happens here; unknown symbols are forwarded to the
/// provider unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: impl Into<String>) -> Result<Self, TickerError> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err(TickerError::Empty);
        }
        if symbol == "." || symbol == ".." || symbol.contains(['/', '\\']) {
            return Err(TickerError::NotAFileName(symbol));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The symbol with `suffix` appended, unless it already carries it.
    ///
    /// This string is both what the provider is asked for and the snapshot
    /// file name. An empty suffix leaves the symbol as-is.
    pub fn qualified(&self, suffix: &str) -> String {
        if suffix.is_empty() || self.0.ends_with(suffix) {
            self.0.clone()
        } else {
            format!("{}{}", self.0, suffix)
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}
