//! Gap computation and cache orchestration for barcache.
//!
//! This crate holds the gap-fill cache core:
//!
//! - [`compute_gaps`] - Missing sub-ranges of a request given recorded coverage
//! - [`BarCache`] - Fetches only the gaps, strips the live bar, persists the rest
//! - [`BarStore`], [`OriginGateway`], [`SessionOracle`] - Injected collaborators
//! - [`FetchReport`] - Per-gap outcomes returned alongside the bars
//! - [`CacheConfig`] - Buffering, timeout and concurrency settings

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barcache/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod config;
mod error;
mod gaps;
mod provider;
mod report;
mod session;

pub use cache::{BarCache, BarResponse};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use gaps::{compute_gaps, covered_fraction};
pub use provider::{BarStore, OriginGateway, SessionOracle};
pub use report::{FetchReport, GapOutcome, GapReport};
pub use session::{ClosedSessionOracle, StaticSessionOracle};
