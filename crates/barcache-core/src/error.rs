//! Request-level errors.

use barcache_types::{RangeError, StoreError, TimeRange};
use thiserror::Error;

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors that fail a whole cache request.
///
/// Origin failures are not here: they are recorded per gap in the
/// [`FetchReport`](crate::FetchReport) and only surface as
/// [`CacheError::Incomplete`] when the caller asks for strict results.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The requested or recorded range is malformed.
    #[error(transparent)]
    InvalidRange(#[from] RangeError),

    /// The bar store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// At least one gap could not be fetched.
    #[error("{failed} gap(s) could not be fetched, first {first_gap}: {reason}")]
    Incomplete {
        /// Number of failed gaps.
        failed: usize,
        /// The earliest failed gap.
        first_gap: TimeRange,
        /// Why the earliest gap failed.
        reason: String,
    },
}
