//! Origin URL construction.

use barcache_types::{BarSet, TimeRange};
use url::Url;

/// Builds the URL for a bar query.
///
/// URL format: `{base}/bars?instrument={EX:SYM}&timeframe={tf}&from={from_t}&to={to_t}`
///
/// Any query already on `base` is replaced.
///
/// # Example
///
/// ```
/// use barcache_origin::url::bars_url;
/// use barcache_types::{BarSet, TimeRange, Timeframe};
/// use url::Url;
///
/// let base = Url::parse("https://data.example.com/api").unwrap();
/// let bar_set = BarSet::new("globex:es".parse().unwrap(), Timeframe::Minute5);
/// let url = bars_url(&base, &bar_set, TimeRange::new(0, 300).unwrap());
/// assert_eq!(
///     url.as_str(),
///     "https://data.example.com/api/bars?instrument=GLOBEX%3AES&timeframe=m5&from=0&to=300"
/// );
/// ```
#[must_use]
pub fn bars_url(base: &Url, bar_set: &BarSet, range: TimeRange) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("bars");
    }
    url.query_pairs_mut()
        .clear()
        .append_pair("instrument", &bar_set.instrument.to_string())
        .append_pair("timeframe", bar_set.timeframe.as_str())
        .append_pair("from", &range.from_t.to_string())
        .append_pair("to", &range.to_t.to_string());
    url
}
