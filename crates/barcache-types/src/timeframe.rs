//! Bar timeframe definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::TimeframeParseError;

/// Bar granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1-minute bars.
    #[serde(rename = "m1")]
    Minute1,
    /// 5-minute bars.
    #[serde(rename = "m5")]
    Minute5,
    /// 15-minute bars.
    #[serde(rename = "m15")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "m30")]
    Minute30,
    /// 1-hour bars.
    #[serde(rename = "h1")]
    Hour1,
    /// Daily bars.
    #[serde(rename = "d1")]
    Day1,
    /// Weekly bars.
    #[serde(rename = "w1")]
    Week1,
    /// Monthly bars.
    #[serde(rename = "mn1")]
    Month1,
}

impl Timeframe {
    /// Returns the nominal bar duration in seconds.
    ///
    /// Monthly bars have no fixed duration and return `None`.
    #[must_use]
    pub const fn seconds(&self) -> Option<u64> {
        match self {
            Self::Minute1 => Some(60),
            Self::Minute5 => Some(300),
            Self::Minute15 => Some(900),
            Self::Minute30 => Some(1800),
            Self::Hour1 => Some(3600),
            Self::Day1 => Some(86_400),
            Self::Week1 => Some(604_800),
            Self::Month1 => None,
        }
    }

    /// Returns true for timeframes shorter than a day.
    #[must_use]
    pub const fn is_intraday(&self) -> bool {
        matches!(
            self,
            Self::Minute1 | Self::Minute5 | Self::Minute15 | Self::Minute30 | Self::Hour1
        )
    }

    /// Returns the timeframe as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "m1",
            Self::Minute5 => "m5",
            Self::Minute15 => "m15",
            Self::Minute30 => "m30",
            Self::Hour1 => "h1",
            Self::Day1 => "d1",
            Self::Week1 => "w1",
            Self::Month1 => "mn1",
        }
    }

    /// Returns all available timeframes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute1,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Day1,
            Self::Week1,
            Self::Month1,
        ]
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Single-letter resolution codes are case sensitive: "M" is a month.
        match s {
            "D" => return Ok(Self::Day1),
            "W" => return Ok(Self::Week1),
            "M" => return Ok(Self::Month1),
            _ => {}
        }

        match s.to_lowercase().as_str() {
            "m1" | "1m" | "1" | "minute" => Ok(Self::Minute1),
            "m5" | "5m" | "5" => Ok(Self::Minute5),
            "m15" | "15m" | "15" => Ok(Self::Minute15),
            "m30" | "30m" | "30" => Ok(Self::Minute30),
            "h1" | "1h" | "60" | "hour" => Ok(Self::Hour1),
            "d1" | "1d" | "day" | "daily" => Ok(Self::Day1),
            "w1" | "1w" | "week" | "weekly" => Ok(Self::Week1),
            "mn1" | "1mo" | "month" | "monthly" => Ok(Self::Month1),
            _ => Err(TimeframeParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_seconds() {
        assert_eq!(Timeframe::Minute1.seconds(), Some(60));
        assert_eq!(Timeframe::Hour1.seconds(), Some(3600));
        assert_eq!(Timeframe::Day1.seconds(), Some(86_400));
        assert_eq!(Timeframe::Month1.seconds(), None);
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!("m1".parse::<Timeframe>().unwrap(), Timeframe::Minute1);
        assert_eq!("1h".parse::<Timeframe>().unwrap(), Timeframe::Hour1);
        assert_eq!("H1".parse::<Timeframe>().unwrap(), Timeframe::Hour1);
        assert_eq!("60".parse::<Timeframe>().unwrap(), Timeframe::Hour1);
        assert!("invalid".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_resolution_codes_are_case_sensitive() {
        assert_eq!("M".parse::<Timeframe>().unwrap(), Timeframe::Month1);
        assert_eq!("D".parse::<Timeframe>().unwrap(), Timeframe::Day1);
        assert_eq!("W".parse::<Timeframe>().unwrap(), Timeframe::Week1);
        assert!("m".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for timeframe in Timeframe::all() {
            assert_eq!(timeframe.to_string().parse::<Timeframe>().unwrap(), *timeframe);
        }
    }

    #[test]
    fn test_is_intraday() {
        assert!(Timeframe::Minute30.is_intraday());
        assert!(!Timeframe::Day1.is_intraday());
    }
}
