//! CLI command implementations.

pub(crate) mod coverage;
pub(crate) mod gaps;
pub(crate) mod get;
pub(crate) mod list;
