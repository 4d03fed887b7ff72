//! Benchmark fixtures for barcache.

use async_trait::async_trait;
use barcache_lib::{Bar, BarSet, Decimal, OriginError, OriginGateway, TimeRange, Timeframe};

/// Builds `count` disjoint coverage ranges of `width` seconds, `stride` apart.
///
/// The ranges are returned in reverse order so gap computation has to sort.
pub fn fragmented_coverage(count: usize, width: i64, stride: i64) -> Vec<TimeRange> {
    let mut ranges: Vec<TimeRange> = (0..count as i64)
        .map(|i| TimeRange {
            from_t: i * stride,
            to_t: i * stride + width,
        })
        .collect();
    ranges.reverse();
    ranges
}

/// A bar set for benchmarks.
pub fn bench_bar_set() -> BarSet {
    BarSet::new(
        "BENCH:SYN".parse().expect("valid instrument"),
        Timeframe::Minute1,
    )
}

/// Origin producing one synthetic bar per `step` seconds, without I/O.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticOrigin {
    /// Seconds between bars.
    pub step: i64,
}

impl SyntheticOrigin {
    /// Generates the bars this origin serves for `range`.
    pub fn bars(&self, range: TimeRange) -> Vec<Bar> {
        let first = range.from_t.div_euclid(self.step) * self.step;
        (0..)
            .map(|i| first + i * self.step)
            .skip_while(|t| *t < range.from_t)
            .take_while(|t| *t < range.to_t)
            .map(|t| {
                let price = Decimal::new(10_000 + t.rem_euclid(500), 2);
                Bar::new(t, price, price, price, price, 100)
            })
            .collect()
    }
}

#[async_trait]
impl OriginGateway for SyntheticOrigin {
    async fn fetch_bars(
        &self,
        _bar_set: &BarSet,
        range: TimeRange,
    ) -> Result<Vec<Bar>, OriginError> {
        Ok(self.bars(range))
    }
}
