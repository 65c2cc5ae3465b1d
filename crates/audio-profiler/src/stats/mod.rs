//! Summary statistics over profiler series
//!
//! Every series is reduced to min, max, mean, median and the nearest-rank
//! 95th/99th percentiles.
//!
//! # Examples
//!
//! ```
//! use audio_profiler::stats::SeriesStatistics;
//!
//! let frame_ms = vec![16.0, 17.5, 15.9, 33.4, 16.2];
//! let summary = SeriesStatistics::compute(&frame_ms);
//! assert_eq!(summary.max, 33.4);
//! assert_eq!(summary.median, 16.2);
//! ```

pub mod percentiles;
pub mod summary;

// Re-export main types and functions
pub use percentiles::{median, nearest_rank};
pub use summary::{RunStatistics, SeriesStatistics};
