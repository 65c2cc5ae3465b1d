//! Run pipeline: capture -> series -> statistics -> findings -> report
//!
//! ```text
//! Capture ──► SeriesSet ──► RunStatistics ──► validate() ──► ProfileReport
//!              (collect)      (per metric)     (policy)
//! ```
//!
//! # Example
//!
//! ```
//! use audio_profiler::{Capture, ProfileRunner, ThresholdPolicy, Verdict};
//!
//! # fn example() -> audio_profiler::error::Result<()> {
//! let capture = Capture::from_json_str(
//!     r#"{ "platform": "Switch", "samples": [ { "unityFrameMs": 15.2, "voices": 20 } ] }"#,
//!     "inline.json",
//! )?;
//!
//! let runner = ProfileRunner::new(ThresholdPolicy::default());
//! let report = runner.run(&capture);
//!
//! assert_eq!(report.metadata.platform, "Switch");
//! assert_eq!(report.verdict(), Verdict::Pass);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{info, instrument};

use crate::config::ThresholdPolicy;
use crate::samples::{Capture, MetricsDocument, SeriesSet};
use crate::stats::RunStatistics;
use crate::validation::{validate, Severity, ValidationResult, Verdict};

/// Capture metadata echoed into the report.
///
/// Values keep whatever JSON type the capture used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetadata {
    pub timestamp: Value,
    pub unity_version: Value,
    pub platform: Value,
    pub sample_count: Value,
    pub total_duration: Value,
    pub sampling_interval: Value,
}

impl RunMetadata {
    pub fn from_document(doc: &MetricsDocument) -> Self {
        let echo = |field: &Option<Value>, default: Value| field.clone().unwrap_or(default);
        let unknown = || Value::from("unknown");
        Self {
            timestamp: echo(&doc.timestamp, unknown()),
            unity_version: echo(&doc.unity_version, unknown()),
            platform: echo(&doc.platform, unknown()),
            sample_count: echo(&doc.sample_count, Value::from(doc.samples.len())),
            total_duration: echo(&doc.total_duration, Value::from(0)),
            sampling_interval: echo(&doc.sampling_interval, Value::from(1)),
        }
    }
}

/// Text form of a metadata value: strings unquoted, anything else as JSON
pub fn display_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Machine-readable validation section of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<&ValidationResult> for ValidationSummary {
    fn from(result: &ValidationResult) -> Self {
        Self {
            passed: !result.has_failures(),
            errors: result.errors(),
            warnings: result.warnings(),
        }
    }
}

/// Result of a complete run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub metadata: RunMetadata,
    pub statistics: RunStatistics,
    pub validation: ValidationSummary,
    /// All findings including passed checks; console output only
    #[serde(skip)]
    pub findings: ValidationResult,
}

impl ProfileReport {
    pub fn verdict(&self) -> Verdict {
        self.findings.verdict()
    }

    /// Process exit status for this report: 0 on pass, 1 on fail
    pub fn exit_code(&self) -> u8 {
        match self.verdict() {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

/// Runs captures through the statistics and validation stages
#[derive(Debug, Clone, Default)]
pub struct ProfileRunner {
    policy: ThresholdPolicy,
}

impl ProfileRunner {
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Analyse a capture. Pure: identical input gives an identical report.
    #[instrument(skip_all, fields(path = %capture.path().display()))]
    pub fn run(&self, capture: &Capture) -> ProfileReport {
        info!("Processing {} samples...", capture.samples().len());

        let series = SeriesSet::collect(capture.samples());
        let statistics = RunStatistics::from_series(&series);
        let findings = validate(&statistics, &self.policy);

        info!(
            verdict = %findings.verdict(),
            errors = findings.messages(Severity::Error).count(),
            warnings = findings.messages(Severity::Warning).count(),
            "validation complete"
        );

        ProfileReport {
            metadata: RunMetadata::from_document(capture.document()),
            statistics,
            validation: ValidationSummary::from(&findings),
            findings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::Metric;

    fn capture(json: &str) -> Capture {
        Capture::from_json_str(json, "test.json").unwrap()
    }

    #[test]
    fn test_metadata_defaults() {
        let report = ProfileRunner::default().run(&capture(r#"{ "samples": [ {}, {} ] }"#));
        let metadata = report.metadata;

        assert_eq!(metadata.timestamp, "unknown");
        assert_eq!(metadata.unity_version, "unknown");
        assert_eq!(metadata.platform, "unknown");
        assert_eq!(metadata.sample_count, 2);
        assert_eq!(metadata.total_duration, 0);
        assert_eq!(metadata.sampling_interval, 1);
    }

    #[test]
    fn test_numeric_metadata_is_echoed() {
        let report = ProfileRunner::default().run(&capture(
            r#"{ "timestamp": 1714560000, "sampleCount": 3.0, "samples": [ { "voices": 4 } ] }"#,
        ));
        assert_eq!(report.metadata.timestamp, serde_json::json!(1714560000));
        assert_eq!(report.metadata.sample_count, serde_json::json!(3.0));
        assert_eq!(report.verdict(), Verdict::Pass);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["metadata"]["timestamp"], serde_json::json!(1714560000));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&serde_json::json!("PS5")), "PS5");
        assert_eq!(display_value(&serde_json::json!(1714560000)), "1714560000");
        assert_eq!(display_value(&serde_json::json!(60.0)), "60.0");
    }

    #[test]
    fn test_reported_sample_count_is_echoed() {
        let report =
            ProfileRunner::default().run(&capture(r#"{ "sampleCount": 600, "samples": [ {} ] }"#));
        assert_eq!(report.metadata.sample_count, 600);
    }

    #[test]
    fn test_failing_run() {
        let report = ProfileRunner::default().run(&capture(
            r#"{ "samples": [ { "fmodCpuDsp": 10 }, { "fmodCpuDsp": 25 }, { "fmodCpuDsp": 5 } ] }"#,
        ));

        assert_eq!(report.statistics.get(Metric::FmodCpuDsp).max, 25.0);
        assert_eq!(report.verdict(), Verdict::Fail);
        assert_eq!(report.exit_code(), 1);
        assert!(!report.validation.passed);
        assert!(report
            .validation
            .errors
            .contains(&"FMOD DSP CPU max 25.00 > 20.00".to_string()));
    }

    #[test]
    fn test_warnings_do_not_fail_the_run() {
        let report = ProfileRunner::default()
            .run(&capture(r#"{ "samples": [ { "voices": 40 }, { "voices": 50 } ] }"#));

        assert_eq!(report.verdict(), Verdict::Pass);
        assert_eq!(report.exit_code(), 0);
        assert!(report.validation.passed);
        assert_eq!(report.validation.warnings.len(), 1);
        assert!(report.validation.errors.is_empty());
    }

    #[test]
    fn test_report_json_sections() {
        let report = ProfileRunner::default().run(&capture(r#"{ "samples": [ { "voices": 3 } ] }"#));
        let value = serde_json::to_value(&report).unwrap();

        assert!(value.get("metadata").is_some());
        assert!(value.get("findings").is_none());
        assert_eq!(value["statistics"]["voices"]["max"], serde_json::json!(3));
        assert_eq!(value["validation"]["passed"], serde_json::json!(true));
        assert_eq!(value["metadata"]["unity_version"], serde_json::json!("unknown"));
    }
}
