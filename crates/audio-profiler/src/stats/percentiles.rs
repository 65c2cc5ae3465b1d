//! Rank statistics on sorted samples.
//!
//! Percentiles use the nearest-rank rule without interpolation so that
//! reports stay comparable with captures analysed by earlier tooling.

use std::cmp::Ordering;

/// Sort a copy of `samples` ascending. The sort is stable.
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Nearest-rank percentile of an ascending slice.
///
/// Selects the element at index `floor(len * fraction)`, clipped to the last
/// element.
///
/// # Arguments
///
/// * `sorted` - Samples sorted ascending
/// * `fraction` - Rank as a fraction in `0.0..=1.0` (0.95 for p95)
///
/// # Returns
///
/// * `Some(value)` - The element at the computed rank
/// * `None` - If `sorted` is empty or `fraction` is out of range
///
/// # Examples
///
/// ```
/// use audio_profiler::stats::percentiles::nearest_rank;
///
/// let data: Vec<f64> = (1..=20).map(f64::from).collect();
/// // floor(20 * 0.95) = 19 -> the 20th element
/// assert_eq!(nearest_rank(&data, 0.95), Some(20.0));
/// assert_eq!(nearest_rank(&[7.0], 0.99), Some(7.0));
/// ```
pub fn nearest_rank(sorted: &[f64], fraction: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&fraction) {
        return None;
    }

    let index = ((sorted.len() as f64 * fraction).floor() as usize).min(sorted.len() - 1);
    Some(sorted[index])
}

/// Median of an ascending slice: the middle element, or the mean of the two
/// middle elements for even lengths.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let count = sorted.len();
    if count == 0 {
        return None;
    }

    let mid = count / 2;
    if count % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}
