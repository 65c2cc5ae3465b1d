//! Audio performance gate for profiler captures
//!
//! This crate turns a captured time series of audio engine and frame timing
//! samples into summary statistics and checks them against a threshold
//! policy, producing a pass/fail verdict suitable for CI gating.
//!
//! # Features
//!
//! - **Sample collection**: Tolerant extraction of the mixer CPU, voice count
//!   and frame time series from loosely structured captures
//! - **Statistics**: min, max, mean, median and nearest-rank p95/p99
//! - **Threshold policy**: Built-in limits with per-leaf JSON or TOML overrides
//! - **Validation**: Errors for worst-case breaches, warnings for typical-load breaches
//! - **Multiple Output Formats**: JSON artifact, Console and Markdown reports
//!
//! # Example
//!
//! ```no_run
//! use audio_profiler::{config, Capture, OutputFormat, ProfileRunner, Reporter};
//!
//! # fn example() -> anyhow::Result<()> {
//! let capture = Capture::load("profiler_output.json")?;
//! let (policy, _source) = config::load_policy(&config::candidate_paths(["."]));
//!
//! let report = ProfileRunner::new(policy).run(&capture);
//!
//! Reporter::new(OutputFormat::Console).report(&report)?;
//! Reporter::new(OutputFormat::JsonPretty).write_to_file(&report, "report.json")?;
//!
//! std::process::exit(i32::from(report.exit_code()));
//! # }
//! ```
//!
//! # Threshold overrides
//!
//! ```json
//! {
//!   "fmod": {
//!     "cpu": { "dsp": { "max": 20.0, "avg": 10.0 }, "total": { "max": 25.0 } },
//!     "voices": { "max": 64, "avg": 32 }
//!   },
//!   "unity": { "frame_ms": { "max": 33.0, "avg": 16.6 } }
//! }
//! ```

pub mod config;
pub mod error;
pub mod reporter;
pub mod runner;
pub mod samples;
pub mod stats;
pub mod validation;

// Re-export main types for convenience
pub use config::{ThresholdPolicy, ThresholdSource};
pub use error::{ProfilerError, ThresholdError};
pub use reporter::{OutputFormat, Reporter};
pub use runner::{ProfileReport, ProfileRunner};
pub use samples::{Capture, Metric};
pub use validation::{Finding, Severity, Verdict};
