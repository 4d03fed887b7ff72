//! Collaborator interfaces the cache depends on.

use async_trait::async_trait;
use barcache_types::{
    Bar, BarSet, InstrumentKey, OracleError, OriginError, StoreError, TimeRange,
};

/// Durable storage for bars and their coverage ranges, keyed by [`BarSet`].
///
/// Implementations must keep, per bar set, at most one bar per timestamp and
/// a set of non-overlapping coverage ranges. Concurrent [`add_bars`] calls for
/// the same bar set must not lose coverage: each call's read-merge-write must
/// be atomic with respect to the others.
///
/// [`add_bars`]: BarStore::add_bars
#[async_trait]
pub trait BarStore: Send + Sync {
    /// Returns the recorded coverage ranges for `bar_set`, in any order.
    async fn coverage_ranges(&self, bar_set: &BarSet) -> Result<Vec<TimeRange>, StoreError>;

    /// Returns the stored bars with `t` inside `range`, ascending by `t`.
    async fn bars(&self, bar_set: &BarSet, range: TimeRange) -> Result<Vec<Bar>, StoreError>;

    /// Returns the newest stored timestamp, or `None` if nothing is stored.
    async fn latest_timestamp(&self, bar_set: &BarSet) -> Result<Option<i64>, StoreError>;

    /// Stores `bars` and records `covered` as fetched.
    ///
    /// Re-adding a timestamp replaces the stored bar instead of duplicating
    /// it. `covered` is merged with overlapping or adjacent coverage; an
    /// empty `covered` stores the bars without touching coverage.
    async fn add_bars(
        &self,
        bar_set: &BarSet,
        bars: Vec<Bar>,
        covered: TimeRange,
    ) -> Result<(), StoreError>;

    /// Lists the bar sets the store holds anything for.
    async fn bar_sets(&self) -> Result<Vec<BarSet>, StoreError>;
}

/// The external market-data source.
#[async_trait]
pub trait OriginGateway: Send + Sync {
    /// Fetches the bars of `bar_set` within `range`, ascending by `t`.
    ///
    /// An empty result means the origin has no bars there. Transport and
    /// protocol failures are reported as errors.
    async fn fetch_bars(&self, bar_set: &BarSet, range: TimeRange)
    -> Result<Vec<Bar>, OriginError>;
}

/// Answers whether a range touches an instrument's current trading session.
#[async_trait]
pub trait SessionOracle: Send + Sync {
    /// Returns true if `range` overlaps the instrument's nearest open session.
    async fn overlaps_open_session(
        &self,
        instrument: &InstrumentKey,
        range: TimeRange,
    ) -> Result<bool, OracleError>;
}
