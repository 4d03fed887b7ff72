//! Gaps command implementation.
//!
//! Dry run of a `get`: shows the ranges that would be fetched.

use crate::display::{open_store, parse_bar_set, parse_range};
use anyhow::Result;
use barcache_lib::covered_fraction;
use barcache_lib::prelude::*;
use std::path::PathBuf;

/// Print the missing ranges of a request and how much of it is cached.
pub(crate) async fn show_gaps(
    instrument: &str,
    timeframe: &str,
    from: &str,
    to: &str,
    store: Option<PathBuf>,
) -> Result<()> {
    let bar_set = parse_bar_set(instrument, timeframe)?;
    let requested = parse_range(from, to)?;
    let store = open_store(store)?;

    let coverage = store.coverage_ranges(&bar_set).await?;
    let gaps = compute_gaps(requested, &coverage)?;
    let fraction = covered_fraction(requested, &coverage)?;

    println!("{bar_set} {requested}");
    println!("Cached: {:.1}%", fraction * 100.0);

    if gaps.is_empty() {
        println!("No gaps.");
        return Ok(());
    }

    println!("\n{:<4} {:<60} {:>12}", "#", "GAP", "SECONDS");
    println!("{}", "-".repeat(78));
    for (i, gap) in gaps.iter().enumerate() {
        println!("{:<4} {:<60} {:>12}", i + 1, gap.to_string(), gap.len_secs());
    }

    println!("\nTotal: {} gap(s)", gaps.len());
    Ok(())
}
