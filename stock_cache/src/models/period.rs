//! The history window requested from a provider.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid period: {}", message)]
    InvalidInput { message: String },
}

/// An opaque history window token understood by the remote provider
/// (e.g. `1d`, `5d`, `1mo`, `1y`, `max`).
///
/// The only local rule is that the token is non-empty after trimming; whether
/// the provider accepts it is the provider's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    pub fn new(token: impl Into<String>) -> Result<Self, PeriodError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(PeriodError::InvalidInput {
                message: "period token cannot be empty".into(),
            });
        }
        Ok(Self(token))
    }

    /// One trading day, used to probe whether a symbol is listed.
    pub fn one_day() -> Self {
        Self("1d".into())
    }

    /// Trailing year of daily bars.
    pub fn one_year() -> Self {
        Self("1y".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::one_year()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_passed_through_trimmed() {
        assert_eq!("  6mo ".parse::<Period>().unwrap().as_str(), "6mo");
        assert_eq!("whatever".parse::<Period>().unwrap().as_str(), "whatever");
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(
            Period::new("   "),
            Err(PeriodError::InvalidInput { .. })
        ));
    }

    #[test]
    fn default_is_one_year() {
        assert_eq!(Period::default().to_string(), "1y");
    }
}
