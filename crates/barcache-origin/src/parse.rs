//! Origin response decoding.

use barcache_types::{Bar, OriginError, TimeRange};

/// Decodes a JSON array of bars.
///
/// # Errors
///
/// Returns [`OriginError::Decode`] if the body is not a JSON array of bars.
pub fn decode_bars(body: &[u8]) -> Result<Vec<Bar>, OriginError> {
    serde_json::from_slice(body).map_err(|e| OriginError::Decode(e.to_string()))
}

/// Keeps the bars inside the half-open `window` and sorts them by `t`.
///
/// The origin also returns the bar starting exactly at `to_t`; it belongs
/// to the next range and is dropped here.
#[must_use]
pub fn clip_bars(mut bars: Vec<Bar>, window: TimeRange) -> Vec<Bar> {
    bars.retain(|bar| window.contains(bar.t));
    bars.sort_by_key(|bar| bar.t);
    bars
}
