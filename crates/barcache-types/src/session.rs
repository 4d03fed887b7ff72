//! Trading session windows.

use serde::{Deserialize, Serialize};

use crate::{RangeError, TimeRange};

/// The open and close instants of one trading session, epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionWindow {
    /// Session open.
    pub open_t: i64,
    /// Session close.
    pub close_t: i64,
}

impl SessionWindow {
    /// Creates a session window, validating that it opens before it closes.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if `open_t > close_t`.
    pub const fn new(open_t: i64, close_t: i64) -> Result<Self, RangeError> {
        if open_t > close_t {
            return Err(RangeError::Inverted {
                from_t: open_t,
                to_t: close_t,
            });
        }
        Ok(Self { open_t, close_t })
    }

    /// Returns true if `range` touches this session.
    ///
    /// A range overlaps when it lies within the session, or when the session
    /// open or close falls strictly inside it.
    #[must_use]
    pub const fn overlaps(&self, range: &TimeRange) -> bool {
        (range.from_t >= self.open_t && range.to_t < self.close_t)
            || (range.from_t < self.open_t && self.open_t < range.to_t)
            || (range.from_t < self.close_t && self.close_t < range.to_t)
    }

    /// Returns true while the session has not closed yet at `t`.
    ///
    /// A window that is no longer current should be refreshed before it is
    /// used to answer overlap queries.
    #[must_use]
    pub const fn is_current_at(&self, t: i64) -> bool {
        self.close_t > t
    }
}
