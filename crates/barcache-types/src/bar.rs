//! OHLCV bar representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLCV sample.
///
/// Field names follow the origin's wire names so bars round-trip through
/// JSON without renaming. `t` is the bar start in seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Opening price.
    pub o: Decimal,
    /// Highest price during the period.
    pub h: Decimal,
    /// Lowest price during the period.
    pub l: Decimal,
    /// Closing price.
    pub c: Decimal,
    /// Traded volume.
    pub v: u64,
    /// Bar start, epoch seconds.
    pub t: i64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(t: i64, o: Decimal, h: Decimal, l: Decimal, c: Decimal, v: u64) -> Self {
        Self { o, h, l, c, v, t }
    }

    /// Returns the bar start as a UTC date-time, if representable.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.t, 0)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> Decimal {
        self.h - self.l
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> Decimal {
        (self.c - self.o).abs()
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.c > self.o
    }

    /// Returns true if this is a bearish (red) bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.c < self.o
    }
}

impl std::fmt::Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "o={} h={} l={} c={} v={} t={}",
            self.o, self.h, self.l, self.c, self.v, self.t
        )
    }
}
