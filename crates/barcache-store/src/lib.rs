//! Bar store implementations for barcache.
//!
//! - [`MemoryBarStore`] - Process-local map, lost on drop
//! - [`FileBarStore`] - One JSON document per bar set on disk
//! - [`BarSetData`] - The per-bar-set record both stores keep

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barcache/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod data;
mod file;
mod memory;

pub use data::BarSetData;
pub use file::FileBarStore;
pub use memory::MemoryBarStore;
