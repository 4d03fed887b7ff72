//! Instrument and bar-set identities.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{InstrumentParseError, Timeframe};

/// Opaque instrument identity: an exchange plus a symbol on that exchange.
///
/// Parsed from and displayed as `EXCHANGE:SYMBOL`. Both parts are stored
/// upper case so `nasdaq:aapl` and `NASDAQ:AAPL` name the same instrument.
/// Serialised as the `EXCHANGE:SYMBOL` string and validated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstrumentKey {
    exchange: String,
    symbol: String,
}

impl InstrumentKey {
    /// Creates a new instrument key.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is empty, starts with `.`, or
    /// contains characters other than ASCII alphanumerics, `.`, `-` and `_`.
    /// Parts double as path components in the file store.
    pub fn new(
        exchange: impl AsRef<str>,
        symbol: impl AsRef<str>,
    ) -> Result<Self, InstrumentParseError> {
        let exchange = normalize_part(exchange.as_ref())?;
        let symbol = normalize_part(symbol.as_ref())?;
        Ok(Self { exchange, symbol })
    }

    /// Returns the exchange code.
    #[must_use]
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Returns the symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

fn normalize_part(part: &str) -> Result<String, InstrumentParseError> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return Err(InstrumentParseError::EmptyPart(part.to_string()));
    }
    if trimmed.starts_with('.') {
        return Err(InstrumentParseError::InvalidChar {
            input: part.to_string(),
            ch: '.',
        });
    }
    if let Some(ch) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(InstrumentParseError::InvalidChar {
            input: part.to_string(),
            ch,
        });
    }
    Ok(trimmed.to_ascii_uppercase())
}

impl std::fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.exchange, self.symbol)
    }
}

impl FromStr for InstrumentKey {
    type Err = InstrumentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (exchange, symbol) = s
            .split_once(':')
            .ok_or_else(|| InstrumentParseError::MissingSeparator(s.to_string()))?;
        Self::new(exchange, symbol)
    }
}

impl TryFrom<String> for InstrumentKey {
    type Error = InstrumentParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<InstrumentKey> for String {
    fn from(key: InstrumentKey) -> Self {
        key.to_string()
    }
}

/// Identity of a cached bar series: one instrument at one timeframe.
///
/// Bars and coverage ranges are tracked per bar set. A bar set comes into
/// existence the first time it is queried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BarSet {
    /// The instrument.
    pub instrument: InstrumentKey,
    /// The bar granularity.
    pub timeframe: Timeframe,
}

impl BarSet {
    /// Creates a new bar set identity.
    #[must_use]
    pub const fn new(instrument: InstrumentKey, timeframe: Timeframe) -> Self {
        Self {
            instrument,
            timeframe,
        }
    }

    /// Returns a filesystem-safe identifier, e.g. `NASDAQ_AAPL_m5`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!(
            "{}_{}_{}",
            self.instrument.exchange(),
            self.instrument.symbol(),
            self.timeframe
        )
    }
}

impl std::fmt::Display for BarSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.instrument, self.timeframe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_normalize() {
        let key: InstrumentKey = "nasdaq:aapl".parse().unwrap();
        assert_eq!(key.exchange(), "NASDAQ");
        assert_eq!(key.symbol(), "AAPL");
        assert_eq!(key.to_string(), "NASDAQ:AAPL");
        assert_eq!(key, InstrumentKey::new("NASDAQ", "AAPL").unwrap());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "AAPL".parse::<InstrumentKey>(),
            Err(InstrumentParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "NYSE:".parse::<InstrumentKey>(),
            Err(InstrumentParseError::EmptyPart(_))
        ));
        assert!(matches!(
            "NYSE:A/B".parse::<InstrumentKey>(),
            Err(InstrumentParseError::InvalidChar { ch: '/', .. })
        ));
        assert!("NYSE:..".parse::<InstrumentKey>().is_err());
        assert!("NYSE:BRK.B".parse::<InstrumentKey>().is_ok());
    }

    #[test]
    fn test_serde_validates_key() {
        let key: InstrumentKey = serde_json::from_str(r#""nasdaq:aapl""#).unwrap();
        assert_eq!(key, InstrumentKey::new("NASDAQ", "AAPL").unwrap());
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""NASDAQ:AAPL""#);

        assert!(serde_json::from_str::<InstrumentKey>(r#""NYSE:..""#).is_err());
        assert!(serde_json::from_str::<InstrumentKey>(r#""NYSE:../../etc""#).is_err());
        assert!(serde_json::from_str::<InstrumentKey>(r#""AAPL""#).is_err());
    }

    #[test]
    fn test_bar_set_slug() {
        let bar_set = BarSet::new("GLOBEX:ES".parse().unwrap(), Timeframe::Minute5);
        assert_eq!(bar_set.slug(), "GLOBEX_ES_m5");
        assert_eq!(bar_set.to_string(), "GLOBEX:ES m5");
    }
}
