//! Core types for the barcache OHLCV gap-fill cache.
//!
//! This crate provides the fundamental data structures used throughout barcache:
//!
//! - [`Bar`] - A single OHLCV sample keyed by its epoch-second timestamp
//! - [`TimeRange`] - Half-open `[from_t, to_t)` interval in epoch seconds
//! - [`Timeframe`] - Bar granularity
//! - [`InstrumentKey`] / [`BarSet`] - Identities under which bars are cached
//! - [`SessionWindow`] - A trading session's open and close instants

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barcache/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod instrument;
mod session;
mod time_range;
mod timeframe;

pub use bar::Bar;
pub use error::{
    InstrumentParseError, OracleError, OriginError, RangeError, StoreError, TimeframeParseError,
};
pub use instrument::{BarSet, InstrumentKey};
pub use session::SessionWindow;
pub use time_range::{TimeRange, format_epoch};
pub use timeframe::Timeframe;

/// Re-exported so downstream crates construct prices without a direct dependency.
pub use rust_decimal::Decimal;
