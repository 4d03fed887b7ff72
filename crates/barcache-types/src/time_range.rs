//! Half-open time ranges in epoch seconds.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::RangeError;

/// A half-open interval `[from_t, to_t)` in seconds since the epoch.
///
/// Used both for query spans and for recorded coverage. The constructors
/// enforce `from_t <= to_t`; the fields stay public so persisted records can
/// be read back as-is, which is why consumers that accept arbitrary ranges
/// validate them again (see [`TimeRange::validate`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start (inclusive), epoch seconds.
    pub from_t: i64,
    /// End (exclusive), epoch seconds.
    pub to_t: i64,
}

impl TimeRange {
    /// Creates a new range, validating that `from_t <= to_t`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if `from_t > to_t`.
    pub const fn new(from_t: i64, to_t: i64) -> Result<Self, RangeError> {
        if from_t > to_t {
            return Err(RangeError::Inverted { from_t, to_t });
        }
        Ok(Self { from_t, to_t })
    }

    /// Creates a range suitable for a bar query: it must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if `from_t > to_t`, or
    /// [`RangeError::Empty`] if `from_t == to_t`.
    pub const fn query(from_t: i64, to_t: i64) -> Result<Self, RangeError> {
        if from_t == to_t {
            return Err(RangeError::Empty { at: from_t });
        }
        Self::new(from_t, to_t)
    }

    /// Checks the ordering invariant on a range built from raw fields.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if `from_t > to_t`.
    pub const fn validate(&self) -> Result<(), RangeError> {
        if self.from_t > self.to_t {
            return Err(RangeError::Inverted {
                from_t: self.from_t,
                to_t: self.to_t,
            });
        }
        Ok(())
    }

    /// Returns true if the range has zero width.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from_t >= self.to_t
    }

    /// Returns the width of the range in seconds.
    #[must_use]
    pub const fn len_secs(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.to_t - self.from_t
        }
    }

    /// Returns true if `t` falls inside `[from_t, to_t)`.
    #[must_use]
    pub const fn contains(&self, t: i64) -> bool {
        t >= self.from_t && t < self.to_t
    }

    /// Returns true if the two ranges share at least one second.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        other.to_t > self.from_t && other.from_t < self.to_t
    }

    /// Returns the range extended by `secs` on both sides.
    #[must_use]
    pub const fn widen(&self, secs: i64) -> Self {
        Self {
            from_t: self.from_t.saturating_sub(secs),
            to_t: self.to_t.saturating_add(secs),
        }
    }

    /// Returns the intersection with `bounds`, or `None` if they are disjoint.
    #[must_use]
    pub fn clamp_to(&self, bounds: &Self) -> Option<Self> {
        let from_t = self.from_t.max(bounds.from_t);
        let to_t = self.to_t.min(bounds.to_t);
        (from_t < to_t).then_some(Self { from_t, to_t })
    }

    /// Sorts and merges ranges that overlap or touch, dropping empty ones.
    ///
    /// The result is strictly increasing with a positive distance between
    /// consecutive ranges.
    #[must_use]
    pub fn coalesce(ranges: impl IntoIterator<Item = Self>) -> Vec<Self> {
        let mut sorted: Vec<Self> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
        sorted.sort_unstable();

        let mut merged: Vec<Self> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if range.from_t <= last.to_t => {
                    last.to_t = last.to_t.max(range.to_t);
                }
                _ => merged.push(range),
            }
        }
        merged
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} ({}), {} ({}))",
            self.from_t,
            format_epoch(self.from_t),
            self.to_t,
            format_epoch(self.to_t)
        )
    }
}

/// Formats an epoch-second timestamp as an RFC 3339 UTC string.
///
/// Timestamps outside chrono's representable range fall back to the raw number.
#[must_use]
pub fn format_epoch(t: i64) -> String {
    DateTime::from_timestamp(t, 0).map_or_else(
        || t.to_string(),
        |dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(from_t: i64, to_t: i64) -> TimeRange {
        TimeRange::new(from_t, to_t).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted() {
        assert_eq!(
            TimeRange::new(10, 5),
            Err(RangeError::Inverted { from_t: 10, to_t: 5 })
        );
        assert!(TimeRange::new(5, 5).is_ok());
    }

    #[test]
    fn test_query_rejects_empty() {
        assert_eq!(TimeRange::query(5, 5), Err(RangeError::Empty { at: 5 }));
        assert!(TimeRange::query(5, 6).is_ok());
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = r(100, 200);
        assert!(range.contains(100));
        assert!(range.contains(199));
        assert!(!range.contains(200));
        assert!(!range.contains(99));
    }

    #[test]
    fn test_intersects() {
        let range = r(100, 200);
        assert!(range.intersects(&r(150, 250)));
        assert!(range.intersects(&r(0, 101)));
        assert!(!range.intersects(&r(200, 300)));
        assert!(!range.intersects(&r(0, 100)));
    }

    #[test]
    fn test_widen() {
        assert_eq!(r(100_000, 200_000).widen(86_401), r(13_599, 286_401));
        let extreme = TimeRange {
            from_t: i64::MIN + 1,
            to_t: i64::MAX - 1,
        };
        assert_eq!(
            extreme.widen(10),
            TimeRange {
                from_t: i64::MIN,
                to_t: i64::MAX
            }
        );
    }

    #[test]
    fn test_clamp_to() {
        assert_eq!(r(0, 300).clamp_to(&r(100, 200)), Some(r(100, 200)));
        assert_eq!(r(0, 100).clamp_to(&r(100, 200)), None);
    }

    #[test]
    fn test_coalesce_merges_touching_and_overlapping() {
        let merged = TimeRange::coalesce([r(200, 300), r(0, 100), r(100, 150), r(250, 400)]);
        assert_eq!(merged, vec![r(0, 150), r(200, 400)]);
    }

    #[test]
    fn test_coalesce_drops_empty() {
        let merged = TimeRange::coalesce([r(10, 10), r(20, 30)]);
        assert_eq!(merged, vec![r(20, 30)]);
    }

    #[test]
    fn test_display() {
        let text = r(0, 60).to_string();
        assert_eq!(text, "[0 (1970-01-01T00:00:00Z), 60 (1970-01-01T00:01:00Z))");
    }
}
