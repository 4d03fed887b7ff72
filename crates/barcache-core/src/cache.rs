//! The gap-fill cache orchestrator.

use barcache_types::{Bar, BarSet, OriginError, RangeError, StoreError, TimeRange};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    BarStore, CacheConfig, CacheError, FetchReport, GapOutcome, GapReport, OriginGateway, Result,
    SessionOracle, compute_gaps,
};

/// Bars for one request together with how the missing parts were filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarResponse {
    /// Ascending bars for the requested range. The live bar, if any, is last.
    pub bars: Vec<Bar>,
    /// The still-forming bar appended to `bars`; never persisted.
    pub live_bar: Option<Bar>,
    /// Per-gap outcomes.
    pub report: FetchReport,
}

impl BarResponse {
    /// Returns the bars, ignoring any gap failures.
    #[must_use]
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    /// Returns the bars only if every gap was filled.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Incomplete`] naming the earliest failed gap.
    pub fn into_strict(self) -> Result<Vec<Bar>> {
        let failed = self.report.failures().count();
        match self.report.failures().next() {
            Some(first) => Err(CacheError::Incomplete {
                failed,
                first_gap: first.gap,
                reason: match &first.outcome {
                    GapOutcome::Failed { reason } => reason.clone(),
                    GapOutcome::Persisted { .. } => String::new(),
                },
            }),
            None => Ok(self.bars),
        }
    }

    /// Returns the bars that came from the store, without the live bar.
    #[must_use]
    pub fn persisted(&self) -> &[Bar] {
        let end = self.bars.len() - usize::from(self.live_bar.is_some());
        &self.bars[..end]
    }
}

/// Origin response for one gap, before anything is written.
struct FetchedGap {
    gap: TimeRange,
    fetch_window: TimeRange,
    in_session: bool,
    bars: std::result::Result<Vec<Bar>, String>,
}

impl FetchedGap {
    /// The newest bar of an in-session gap, if nothing stored before the request is as new.
    fn live_candidate(&self, baseline: Option<i64>) -> Option<Bar> {
        if !self.in_session {
            return None;
        }
        let newest = self.bars.as_ref().ok()?.last().copied()?;
        baseline
            .is_none_or(|latest| newest.t > latest)
            .then_some(newest)
    }
}

/// Serves bar ranges from a store, fetching only what is missing.
///
/// Cloning is cheap; clones share the same collaborators.
#[derive(Clone)]
pub struct BarCache {
    store: Arc<dyn BarStore>,
    origin: Arc<dyn OriginGateway>,
    oracle: Arc<dyn SessionOracle>,
    config: CacheConfig,
}

impl std::fmt::Debug for BarCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BarCache {
    /// Creates a cache over the given collaborators with default settings.
    #[must_use]
    pub fn new(
        store: Arc<dyn BarStore>,
        origin: Arc<dyn OriginGateway>,
        oracle: Arc<dyn SessionOracle>,
    ) -> Self {
        Self {
            store,
            origin,
            oracle,
            config: CacheConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn BarStore> {
        &self.store
    }

    /// Returns the gaps a [`get_bars`](Self::get_bars) call would fetch, without fetching.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is malformed or the store fails.
    pub async fn gaps(&self, bar_set: &BarSet, requested: TimeRange) -> Result<Vec<TimeRange>> {
        let coverage = self.store.coverage_ranges(bar_set).await?;
        Ok(compute_gaps(requested, &coverage)?)
    }

    /// Returns the bars of `bar_set` within `requested`, filling gaps from the origin.
    ///
    /// Gaps are fetched independently; a failed gap is recorded in the
    /// response's report and the remaining gaps still run. The result is
    /// ascending by `t` and ends with the live bar when one was seen.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidRange`] for an empty or inverted range
    /// and [`CacheError::Store`] if the store fails at any point.
    #[tracing::instrument(skip_all, fields(bar_set = %bar_set, requested = %requested))]
    pub async fn get_bars(&self, bar_set: &BarSet, requested: TimeRange) -> Result<BarResponse> {
        requested.validate()?;
        if requested.is_empty() {
            return Err(RangeError::Empty {
                at: requested.from_t,
            }
            .into());
        }

        let coverage = self.store.coverage_ranges(bar_set).await?;
        let gaps = compute_gaps(requested, &coverage)?;
        // Live-bar detection compares against what was stored before this request wrote anything.
        let baseline = self.store.latest_timestamp(bar_set).await?;
        let now = chrono::Utc::now().timestamp();

        debug!(gaps = gaps.len(), ?baseline, "computed missing ranges");

        let concurrency = self.config.concurrency.max(1);
        let fetched: Vec<FetchedGap> = stream::iter(gaps)
            .map(|gap| self.fetch_gap(bar_set, gap))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        // Only the newest bar of the whole request is still forming. Newer bars
        // from other session gaps make every other candidate a closed bar.
        let live_bar = fetched
            .iter()
            .filter_map(|gap| gap.live_candidate(baseline))
            .max_by_key(|bar| bar.t)
            .filter(|live| requested.contains(live.t));

        let reports: Vec<GapReport> = stream::iter(fetched)
            .map(|gap| self.persist_gap(bar_set, gap, live_bar, now))
            .buffer_unordered(concurrency)
            .try_collect()
            .await?;
        let report = FetchReport::new(reports);

        let mut bars = self.store.bars(bar_set, requested).await?;
        let live_bar = live_bar.filter(|live| bars.last().is_none_or(|last| live.t > last.t));
        if let Some(live) = live_bar {
            bars.push(live);
        }

        info!(
            bars = bars.len(),
            fetched_gaps = report.fetch_count(),
            failed_gaps = report.failures().count(),
            stored = report.stored_count(),
            live = live_bar.is_some(),
            "served bars"
        );

        Ok(BarResponse {
            bars,
            live_bar,
            report,
        })
    }

    async fn fetch_gap(&self, bar_set: &BarSet, gap: TimeRange) -> FetchedGap {
        let in_session = match self
            .oracle
            .overlaps_open_session(&bar_set.instrument, gap)
            .await
        {
            Ok(in_session) => in_session,
            Err(e) => {
                warn!(%gap, error = %e, "session check failed, treating gap as closed");
                false
            }
        };

        // Widening absorbs boundary skew in historical data; session gaps are fetched exactly.
        let fetch_window = if in_session {
            gap
        } else {
            gap.widen(self.config.closed_session_buffer)
        };

        debug!(%gap, %fetch_window, in_session, "missing bars, retrieving from origin");

        let bars = match tokio::time::timeout(
            self.config.fetch_timeout,
            self.origin.fetch_bars(bar_set, fetch_window),
        )
        .await
        {
            Ok(Ok(fetched)) => {
                let mut bars = ascending_unique(fetched);
                bars.retain(|bar| fetch_window.contains(bar.t));
                if bars.is_empty() {
                    debug!(%fetch_window, "no bars from origin");
                } else {
                    debug!(%fetch_window, count = bars.len(), "received bars from origin");
                }
                Ok(bars)
            }
            Ok(Err(e)) => {
                warn!(%gap, error = %e, "origin fetch failed");
                Err(e.to_string())
            }
            Err(_) => {
                let e = OriginError::Timeout(self.config.fetch_timeout);
                warn!(%gap, error = %e, "origin fetch failed");
                Err(e.to_string())
            }
        };

        FetchedGap {
            gap,
            fetch_window,
            in_session,
            bars,
        }
    }

    async fn persist_gap(
        &self,
        bar_set: &BarSet,
        fetched: FetchedGap,
        live_bar: Option<Bar>,
        now: i64,
    ) -> std::result::Result<GapReport, StoreError> {
        let FetchedGap {
            gap,
            fetch_window,
            in_session,
            bars,
        } = fetched;

        let mut bars = match bars {
            Ok(bars) => bars,
            Err(reason) => {
                return Ok(GapReport {
                    gap,
                    fetch_window,
                    in_session,
                    outcome: GapOutcome::Failed { reason },
                });
            }
        };

        let held_back = live_bar.filter(|live| {
            in_session && bars.last().is_some_and(|newest| newest.t == live.t)
        });
        if held_back.is_some() {
            bars.pop();
        }

        // Coverage is recorded for the computed gap, not the widened window. Inside a
        // session it stops at the live bar (or now) so that period is fetched again.
        let covered = if in_session {
            let to_t = held_back.map_or(now, |live| live.t);
            gap.clamp_to(&TimeRange {
                from_t: i64::MIN,
                to_t,
            })
            .unwrap_or(TimeRange {
                from_t: gap.from_t,
                to_t: gap.from_t,
            })
        } else {
            gap
        };

        let stored = bars.len();
        if stored > 0 || !covered.is_empty() {
            self.store.add_bars(bar_set, bars, covered).await?;
        }

        if let Some(live) = &held_back {
            debug!(t = live.t, "holding back live bar");
        }

        Ok(GapReport {
            gap,
            fetch_window,
            in_session,
            outcome: GapOutcome::Persisted {
                stored,
                live: held_back.is_some(),
            },
        })
    }
}

/// Sorts by timestamp and keeps the last bar seen for each timestamp.
fn ascending_unique(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.reverse();
    bars.sort_by_key(|bar| bar.t);
    bars.dedup_by_key(|bar| bar.t);
    bars
}
