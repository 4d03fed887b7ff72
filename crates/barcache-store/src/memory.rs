//! Process-local bar store.

use async_trait::async_trait;
use barcache_core::BarStore;
use barcache_types::{Bar, BarSet, StoreError, TimeRange};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::BarSetData;

/// A [`BarStore`] backed by a map in memory. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryBarStore {
    sets: RwLock<HashMap<BarSet, BarSetData>>,
}

impl MemoryBarStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BarStore for MemoryBarStore {
    async fn coverage_ranges(&self, bar_set: &BarSet) -> Result<Vec<TimeRange>, StoreError> {
        Ok(self
            .sets
            .read()
            .await
            .get(bar_set)
            .map(|data| data.coverage().to_vec())
            .unwrap_or_default())
    }

    async fn bars(&self, bar_set: &BarSet, range: TimeRange) -> Result<Vec<Bar>, StoreError> {
        range.validate()?;
        Ok(self
            .sets
            .read()
            .await
            .get(bar_set)
            .map(|data| data.bars_in(range))
            .unwrap_or_default())
    }

    async fn latest_timestamp(&self, bar_set: &BarSet) -> Result<Option<i64>, StoreError> {
        Ok(self
            .sets
            .read()
            .await
            .get(bar_set)
            .and_then(BarSetData::latest_timestamp))
    }

    async fn add_bars(
        &self,
        bar_set: &BarSet,
        bars: Vec<Bar>,
        covered: TimeRange,
    ) -> Result<(), StoreError> {
        covered.validate()?;
        let mut sets = self.sets.write().await;
        sets.entry(bar_set.clone())
            .or_default()
            .insert(bars, covered)?;
        Ok(())
    }

    async fn bar_sets(&self) -> Result<Vec<BarSet>, StoreError> {
        let mut sets: Vec<BarSet> = self.sets.read().await.keys().cloned().collect();
        sets.sort();
        Ok(sets)
    }
}
