//! Coverage command implementation.

use crate::display::{open_store, parse_bar_set};
use anyhow::Result;
use std::path::PathBuf;

/// Print the recorded coverage ranges of a bar set.
pub(crate) async fn show_coverage(
    instrument: &str,
    timeframe: &str,
    store: Option<PathBuf>,
) -> Result<()> {
    let bar_set = parse_bar_set(instrument, timeframe)?;
    let store = open_store(store)?;
    let data = store.load(&bar_set).await?;

    if data.coverage().is_empty() {
        println!("{bar_set}: nothing cached.");
        return Ok(());
    }

    println!("{bar_set}: {} bars", data.len());
    for range in data.coverage() {
        println!("  {range}");
    }

    let total: i64 = data.coverage().iter().map(|range| range.len_secs()).sum();
    println!("\nTotal: {} range(s), {total} seconds", data.coverage().len());
    Ok(())
}
