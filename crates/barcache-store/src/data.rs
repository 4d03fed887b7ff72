//! The per-bar-set record shared by every store.

use barcache_types::{Bar, RangeError, TimeRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bars and coverage of one bar set.
///
/// Bars are keyed by timestamp, so inserting an existing `t` replaces the
/// stored bar. Coverage is kept coalesced: sorted, non-overlapping and
/// non-adjacent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BarSetDocument", into = "BarSetDocument")]
pub struct BarSetData {
    bars: BTreeMap<i64, Bar>,
    coverage: Vec<TimeRange>,
}

impl BarSetData {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the coalesced coverage ranges, ascending.
    #[must_use]
    pub fn coverage(&self) -> &[TimeRange] {
        &self.coverage
    }

    /// Returns the bars with `t` inside `range`, ascending.
    #[must_use]
    pub fn bars_in(&self, range: TimeRange) -> Vec<Bar> {
        if range.is_empty() {
            return Vec::new();
        }
        self.bars
            .range(range.from_t..range.to_t)
            .map(|(_, bar)| *bar)
            .collect()
    }

    /// Returns the newest stored timestamp.
    #[must_use]
    pub fn latest_timestamp(&self) -> Option<i64> {
        self.bars.last_key_value().map(|(t, _)| *t)
    }

    /// Returns the number of stored bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if no bars are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Upserts `bars` and merges `covered` into the coverage.
    ///
    /// An empty `covered` leaves coverage untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if `covered` is inverted; nothing is
    /// changed in that case.
    pub fn insert(
        &mut self,
        bars: impl IntoIterator<Item = Bar>,
        covered: TimeRange,
    ) -> Result<(), RangeError> {
        covered.validate()?;
        self.bars.extend(bars.into_iter().map(|bar| (bar.t, bar)));
        if !covered.is_empty() {
            let merged = TimeRange::coalesce(self.coverage.iter().copied().chain([covered]));
            self.coverage = merged;
        }
        Ok(())
    }
}

/// On-disk shape: bars as a plain ascending array.
#[derive(Serialize, Deserialize)]
struct BarSetDocument {
    coverage: Vec<TimeRange>,
    bars: Vec<Bar>,
}

impl From<BarSetDocument> for BarSetData {
    fn from(doc: BarSetDocument) -> Self {
        Self {
            bars: doc.bars.into_iter().map(|bar| (bar.t, bar)).collect(),
            coverage: TimeRange::coalesce(doc.coverage),
        }
    }
}

impl From<BarSetData> for BarSetDocument {
    fn from(data: BarSetData) -> Self {
        Self {
            coverage: data.coverage,
            bars: data.bars.into_values().collect(),
        }
    }
}
