//! List command implementation.
//!
//! This module handles listing the bar sets held in the store.

use crate::display::open_store;
use anyhow::Result;
use barcache_lib::format_epoch;
use barcache_lib::prelude::*;
use std::path::PathBuf;

/// List cached bar sets with their bar counts.
pub(crate) async fn list_bar_sets(store: Option<PathBuf>) -> Result<()> {
    let store = open_store(store)?;
    let bar_sets = store.bar_sets().await?;

    if bar_sets.is_empty() {
        println!("No bar sets cached in {}.", store.root().display());
        return Ok(());
    }

    println!(
        "{:<24} {:<6} {:>10} {:>8}  {:<20}",
        "INSTRUMENT", "TF", "BARS", "RANGES", "LATEST"
    );
    println!("{}", "-".repeat(74));

    for bar_set in &bar_sets {
        let data = store.load(bar_set).await?;
        let latest = data
            .latest_timestamp()
            .map(format_epoch)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<6} {:>10} {:>8}  {:<20}",
            bar_set.instrument.to_string(),
            bar_set.timeframe.as_str(),
            data.len(),
            data.coverage().len(),
            latest
        );
    }

    println!("\nTotal: {} bar sets", bar_sets.len());
    Ok(())
}
