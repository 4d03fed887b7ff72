//! Missing-range computation.

use barcache_types::{RangeError, TimeRange};

/// Computes the sub-ranges of `requested` not covered by any of `known`.
///
/// `known` may be in any order and may overlap or touch; it is sorted by
/// start before the sweep. The returned gaps are ascending, pairwise
/// disjoint, non-empty and lie inside `requested`. An empty `requested`
/// has no gaps.
///
/// # Errors
///
/// Returns [`RangeError::Inverted`] if `requested` or any known range has
/// `from_t > to_t`.
///
/// # Example
///
/// ```
/// use barcache_core::compute_gaps;
/// use barcache_types::TimeRange;
///
/// let requested = TimeRange::new(0, 300).unwrap();
/// let known = [TimeRange::new(100, 200).unwrap()];
/// let gaps = compute_gaps(requested, &known).unwrap();
/// assert_eq!(gaps, vec![TimeRange::new(0, 100).unwrap(), TimeRange::new(200, 300).unwrap()]);
/// ```
pub fn compute_gaps(requested: TimeRange, known: &[TimeRange]) -> Result<Vec<TimeRange>, RangeError> {
    requested.validate()?;
    for range in known {
        range.validate()?;
    }

    let mut sorted: Vec<&TimeRange> = known.iter().filter(|r| requested.intersects(r)).collect();
    sorted.sort_unstable_by_key(|r| (r.from_t, r.to_t));

    let mut gaps = Vec::new();
    let mut cursor = requested.from_t;

    for range in sorted {
        if range.from_t > cursor {
            gaps.push(TimeRange {
                from_t: cursor,
                to_t: range.from_t,
            });
        }
        cursor = cursor.max(range.to_t);
        if cursor >= requested.to_t {
            break;
        }
    }

    if cursor < requested.to_t {
        gaps.push(TimeRange {
            from_t: cursor,
            to_t: requested.to_t,
        });
    }

    Ok(gaps)
}

/// Returns the share of `requested` already covered by `known`, in `[0, 1]`.
///
/// # Errors
///
/// Returns the same errors as [`compute_gaps`].
pub fn covered_fraction(requested: TimeRange, known: &[TimeRange]) -> Result<f64, RangeError> {
    let total = requested.len_secs();
    if total == 0 {
        return Ok(1.0);
    }
    let missing: i64 = compute_gaps(requested, known)?
        .iter()
        .map(TimeRange::len_secs)
        .sum();
    Ok((total - missing) as f64 / total as f64)
}
