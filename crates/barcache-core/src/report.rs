//! Per-gap fetch outcomes.

use barcache_types::TimeRange;

/// How one gap ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GapOutcome {
    /// Origin bars were stored and the gap's coverage recorded.
    Persisted {
        /// Number of bars handed to the store.
        stored: usize,
        /// Whether the newest fetched bar was held back as the live bar.
        live: bool,
    },
    /// The session check or the origin fetch failed; nothing was stored.
    Failed {
        /// Human-readable cause.
        reason: String,
    },
}

impl GapOutcome {
    /// Returns true if the gap failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Record of one gap's processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapReport {
    /// The missing range as computed from coverage.
    pub gap: TimeRange,
    /// The range actually requested from the origin (widened outside sessions).
    pub fetch_window: TimeRange,
    /// Whether the gap overlapped the open session.
    pub in_session: bool,
    /// Terminal state.
    pub outcome: GapOutcome,
}

/// Per-gap outcomes for one request, ascending by gap start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    gaps: Vec<GapReport>,
}

impl FetchReport {
    pub(crate) fn new(mut gaps: Vec<GapReport>) -> Self {
        gaps.sort_by_key(|g| g.gap.from_t);
        Self { gaps }
    }

    /// Returns every gap's report.
    #[must_use]
    pub fn gaps(&self) -> &[GapReport] {
        &self.gaps
    }

    /// Returns the number of origin fetches attempted.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.gaps.len()
    }

    /// Returns the gaps that failed.
    pub fn failures(&self) -> impl Iterator<Item = &GapReport> {
        self.gaps.iter().filter(|g| g.outcome.is_failed())
    }

    /// Returns true if no gap failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Returns the total number of bars stored across all gaps.
    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.gaps
            .iter()
            .map(|g| match g.outcome {
                GapOutcome::Persisted { stored, .. } => stored,
                GapOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(from_t: i64, outcome: GapOutcome) -> GapReport {
        let gap = TimeRange::new(from_t, from_t + 10).unwrap();
        GapReport {
            gap,
            fetch_window: gap,
            in_session: false,
            outcome,
        }
    }

    #[test]
    fn test_report_sorted_and_counted() {
        let fetch = FetchReport::new(vec![
            report(
                50,
                GapOutcome::Failed {
                    reason: "boom".to_string(),
                },
            ),
            report(
                0,
                GapOutcome::Persisted {
                    stored: 3,
                    live: false,
                },
            ),
        ]);

        assert_eq!(fetch.gaps()[0].gap.from_t, 0);
        assert_eq!(fetch.fetch_count(), 2);
        assert_eq!(fetch.stored_count(), 3);
        assert!(!fetch.is_complete());
        assert_eq!(fetch.failures().count(), 1);
    }

    #[test]
    fn test_empty_report_is_complete() {
        assert!(FetchReport::default().is_complete());
    }
}
