//! Gap-fill OHLCV bar cache.
//!
//! This is a facade crate that re-exports functionality from the barcache
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use barcache_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = BarCache::new(
//!         Arc::new(FileBarStore::with_default_path()?),
//!         Arc::new(HttpOrigin::with_defaults("https://bars.example.com/api")?),
//!         Arc::new(ClosedSessionOracle),
//!     );
//!
//!     let bar_set = BarSet::new("GLOBEX:ES".parse()?, Timeframe::Minute5);
//!     let response = cache
//!         .get_bars(&bar_set, TimeRange::query(1_704_067_200, 1_704_153_600)?)
//!         .await?;
//!
//!     println!(
//!         "{} bars, {} gap(s) fetched",
//!         response.bars.len(),
//!         response.report.fetch_count()
//!     );
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barcache/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export value types
pub use barcache_types::*;

// Re-export the cache core
pub use barcache_core::{
    BarCache, BarResponse, BarStore, CacheConfig, CacheError, ClosedSessionOracle, FetchReport,
    GapOutcome, GapReport, OriginGateway, SessionOracle, StaticSessionOracle, compute_gaps,
    covered_fraction,
};

// Re-export stores
#[cfg(feature = "store")]
pub use barcache_store::{BarSetData, FileBarStore, MemoryBarStore};

// Re-export the HTTP origin
#[cfg(feature = "origin")]
pub use barcache_origin::{ClientConfig, HttpOrigin};

// Re-export formatters
#[cfg(feature = "format")]
pub use barcache_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

/// Prelude module for convenient imports.
///
/// ```
/// use barcache_lib::prelude::*;
/// ```
pub mod prelude {
    pub use barcache_types::{
        Bar, BarSet, Decimal, InstrumentKey, SessionWindow, TimeRange, Timeframe,
    };

    pub use barcache_core::{
        BarCache, BarResponse, BarStore, CacheConfig, CacheError, ClosedSessionOracle,
        OriginGateway, SessionOracle, StaticSessionOracle, compute_gaps,
    };

    #[cfg(feature = "store")]
    pub use barcache_store::{FileBarStore, MemoryBarStore};

    #[cfg(feature = "origin")]
    pub use barcache_origin::{ClientConfig, HttpOrigin};

    #[cfg(feature = "format")]
    pub use barcache_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}
