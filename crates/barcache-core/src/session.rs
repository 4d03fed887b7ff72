//! Session oracles backed by known session windows.

use async_trait::async_trait;
use barcache_types::{InstrumentKey, OracleError, SessionWindow, TimeRange};
use std::collections::HashMap;
use tracing::debug;

use crate::SessionOracle;

/// Oracle answering from a table of each instrument's nearest session.
///
/// Instruments without a window are treated as closed, and so are instruments
/// whose window has already closed: a stale window says nothing about the
/// current session.
#[derive(Debug, Default)]
pub struct StaticSessionOracle {
    windows: HashMap<InstrumentKey, SessionWindow>,
}

impl StaticSessionOracle {
    /// Creates an empty oracle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an oracle seeded with the given windows.
    #[must_use]
    pub fn with_windows(windows: impl IntoIterator<Item = (InstrumentKey, SessionWindow)>) -> Self {
        Self {
            windows: windows.into_iter().collect(),
        }
    }

    /// Answers an overlap query as of `now` (epoch seconds).
    #[must_use]
    pub fn overlaps_at(
        &self,
        instrument: &InstrumentKey,
        range: TimeRange,
        now: i64,
    ) -> bool {
        let Some(window) = self.windows.get(instrument) else {
            return false;
        };
        if !window.is_current_at(now) {
            debug!(%instrument, close_t = window.close_t, "session window is stale");
            return false;
        }
        window.overlaps(&range)
    }
}

#[async_trait]
impl SessionOracle for StaticSessionOracle {
    async fn overlaps_open_session(
        &self,
        instrument: &InstrumentKey,
        range: TimeRange,
    ) -> Result<bool, OracleError> {
        let now = chrono::Utc::now().timestamp();
        Ok(self.overlaps_at(instrument, range, now))
    }
}

/// Oracle for sources with no live session: every gap is historical.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedSessionOracle;

#[async_trait]
impl SessionOracle for ClosedSessionOracle {
    async fn overlaps_open_session(
        &self,
        _instrument: &InstrumentKey,
        _range: TimeRange,
    ) -> Result<bool, OracleError> {
        Ok(false)
    }
}
