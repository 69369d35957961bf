use crate::{
    errors::Error,
    models::{period::Period, ticker::Ticker},
};

/// Splits a comma-separated symbol list, ignoring blank entries.
pub fn parse_symbols(raw: &str) -> Result<Vec<Ticker>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Ticker::new(s).map_err(Error::from))
        .collect()
}

/// The `--period` override, or the configured default.
pub fn parse_period(raw: Option<&str>, default: &Period) -> Result<Period, Error> {
    match raw {
        Some(token) => Ok(Period::new(token)?),
        None => Ok(default.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        let symbols = parse_symbols(" TCS, INFY,,RELIANCE.NS ").unwrap();
        let names: Vec<&str> = symbols.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["TCS", "INFY", "RELIANCE.NS"]);

        assert!(parse_symbols("").unwrap().is_empty());
        assert!(matches!(parse_symbols("TCS,../x"), Err(Error::InvalidTicker(_))));
    }

    #[test]
    fn test_parse_period() {
        let default = Period::one_year();
        assert_eq!(parse_period(None, &default).unwrap(), default);
        assert_eq!(parse_period(Some("5d"), &default).unwrap().as_str(), "5d");
        assert!(matches!(parse_period(Some(" "), &default), Err(Error::InvalidPeriod(_))));
    }
}
