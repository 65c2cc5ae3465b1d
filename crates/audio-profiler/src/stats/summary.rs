//! Per-series and per-run statistical summaries.

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use super::percentiles::{median, nearest_rank, sorted};
use crate::samples::{Metric, SeriesSet};

/// Summary statistics for one series.
///
/// All fields are zero for an empty series. For integral series (voice
/// counts) whole-number `min` and `max` serialize as integers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeriesStatistics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub p95: f64,
    pub p99: f64,
    /// Series holds counts; affects display only
    pub integral: bool,
}

impl SeriesStatistics {
    /// Compute summary statistics for a series.
    ///
    /// # Examples
    ///
    /// ```
    /// use audio_profiler::stats::SeriesStatistics;
    ///
    /// let summary = SeriesStatistics::compute(&[10.0, 25.0, 5.0]);
    /// assert_eq!(summary.min, 5.0);
    /// assert_eq!(summary.max, 25.0);
    /// assert_eq!(summary.median, 10.0);
    /// assert_eq!(summary.p95, 25.0);
    ///
    /// assert_eq!(SeriesStatistics::compute(&[]), SeriesStatistics::default());
    /// ```
    pub fn compute(samples: &[f64]) -> Self {
        let sorted = sorted(samples);
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        let sum: f64 = samples.iter().sum();
        let avg = sum / samples.len() as f64;

        Self {
            min,
            max,
            avg,
            median: median(&sorted).unwrap_or_default(),
            p95: nearest_rank(&sorted, 0.95).unwrap_or_default(),
            p99: nearest_rank(&sorted, 0.99).unwrap_or_default(),
            integral: false,
        }
    }

    /// Compute statistics for a metric, carrying its integral marker.
    pub fn for_metric(metric: Metric, samples: &[f64]) -> Self {
        Self {
            integral: metric.is_integral(),
            ..Self::compute(samples)
        }
    }

    /// `bound` as an integer, if this series is integral and it is whole
    pub fn whole(&self, bound: f64) -> Option<i64> {
        (self.integral && bound.fract() == 0.0).then_some(bound as i64)
    }
}

impl Serialize for SeriesStatistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SeriesStatistics", 6)?;
        for (key, bound) in [("min", self.min), ("max", self.max)] {
            match self.whole(bound) {
                Some(n) => state.serialize_field(key, &n)?,
                None => state.serialize_field(key, &bound)?,
            }
        }
        state.serialize_field("avg", &self.avg)?;
        state.serialize_field("median", &self.median)?;
        state.serialize_field("p95", &self.p95)?;
        state.serialize_field("p99", &self.p99)?;
        state.end()
    }
}

/// Statistics for every [`Metric`] of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    entries: [SeriesStatistics; 6],
}

impl RunStatistics {
    pub fn from_series(series: &SeriesSet) -> Self {
        let mut entries = [SeriesStatistics::default(); 6];
        for (slot, metric) in entries.iter_mut().zip(Metric::ALL) {
            *slot = SeriesStatistics::for_metric(metric, series.get(metric));
        }
        Self { entries }
    }

    pub fn get(&self, metric: Metric) -> &SeriesStatistics {
        &self.entries[metric as usize]
    }

    /// Entries in report order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, &SeriesStatistics)> {
        Metric::ALL.into_iter().zip(self.entries.iter())
    }
}

impl Serialize for RunStatistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (metric, stats) in self.iter() {
            map.serialize_entry(metric.key(), stats)?;
        }
        map.end()
    }
}
