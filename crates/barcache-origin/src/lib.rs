//! HTTP origin gateway for barcache.
//!
//! - [`url::bars_url`] - Builds the bar query URL
//! - [`HttpOrigin`] - Pooled HTTP client with retries, implements `OriginGateway`
//! - [`parse::decode_bars`] - JSON bar array decoding
//! - [`parse::clip_bars`] - Trims a fetch to its window

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barcache/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod parse;
pub mod url;

pub use client::{ClientConfig, HttpOrigin};
