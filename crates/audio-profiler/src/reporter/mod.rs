//! Report rendering
//!
//! This module formats a [`ProfileReport`] for people and for machines.
//!
//! # Output Formats
//!
//! - **JSON**: The report artifact consumed by CI gates
//! - **Console**: Human-readable report with statistics table and findings
//! - **Markdown**: Summary suitable for CI job pages
//!
//! # Example
//!
//! ```no_run
//! use audio_profiler::reporter::{Reporter, OutputFormat};
//! use audio_profiler::runner::ProfileReport;
//!
//! # fn example(report: ProfileReport) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&report)?;
//!
//! Reporter::new(OutputFormat::JsonPretty).write_to_file(&report, "report.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod markdown;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::runner::ProfileReport;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

/// Output format for profile reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON, the report artifact format
    JsonPretty,
    /// Console output
    #[default]
    Console,
    /// Markdown summary
    Markdown,
}

/// Reporter for profile reports
#[derive(Debug, Clone)]
pub struct Reporter {
    format: OutputFormat,
    show_passed: bool,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_passed: true,
        }
    }

    /// Whether passed checks are listed (console and Markdown only)
    pub fn show_passed(mut self, show: bool) -> Self {
        self.show_passed = show;
        self
    }

    /// Report to stdout
    pub fn report(&self, report: &ProfileReport) -> Result<()> {
        let output = self.format_report(report)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    /// Write the formatted report to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, report: &ProfileReport, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_report(report)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Format the report as a string
    pub fn format_report(&self, report: &ProfileReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(report, false),
            OutputFormat::JsonPretty => JsonReporter::format(report, true),
            OutputFormat::Console => ConsoleReporter::format(report, self.show_passed),
            OutputFormat::Markdown => MarkdownReporter::format(report, self.show_passed),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::runner::{ProfileReport, ProfileRunner};
    use crate::samples::Capture;

    pub fn passing_report() -> ProfileReport {
        let capture = Capture::from_json_str(
            r#"{
                "timestamp": "2024-05-01T10:00:00Z",
                "unityVersion": "2022.3.10f1",
                "platform": "Android",
                "totalDuration": 2.0,
                "samplingInterval": 1.0,
                "samples": [
                    { "fmodCpuDsp": 4.0, "fmodCpuStream": 0.5, "fmodCpuUpdate": 0.2, "totalFmodCpu": 6.0, "voices": 12, "unityFrameMs": 14.0 },
                    { "fmodCpuDsp": 6.0, "fmodCpuStream": 0.7, "fmodCpuUpdate": 0.4, "totalFmodCpu": 8.0, "voices": 18, "unityFrameMs": 16.0 }
                ]
            }"#,
            "capture.json",
        )
        .unwrap();
        ProfileRunner::default().run(&capture)
    }

    pub fn failing_report() -> ProfileReport {
        let capture = Capture::from_json_str(
            r#"{
                "samples": [
                    { "fmodCpuDsp": 10, "voices": 40, "unityFrameMs": 15.0 },
                    { "fmodCpuDsp": 25, "voices": 50, "unityFrameMs": 40.0 },
                    { "fmodCpuDsp": 5, "voices": 45, "unityFrameMs": 15.0 }
                ]
            }"#,
            "capture.json",
        )
        .unwrap();
        ProfileRunner::default().run(&capture)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_reporter_json_format() {
        let report = passing_report();
        let output = Reporter::new(OutputFormat::Json).format_report(&report).unwrap();

        assert!(output.contains("\"platform\":\"Android\""));
        assert!(output.contains("\"passed\":true"));
    }

    #[test]
    fn test_reporter_console_format() {
        let report = passing_report();
        let output = Reporter::new(OutputFormat::Console).format_report(&report).unwrap();

        assert!(output.contains("AUDIO PERFORMANCE REPORT"));
        assert!(output.contains("Android"));
    }

    #[test]
    fn test_reporter_markdown_format() {
        let report = failing_report();
        let output = Reporter::new(OutputFormat::Markdown).format_report(&report).unwrap();

        assert!(output.contains("# "));
        assert!(output.contains("FAIL"));
    }

    #[test]
    fn test_default_format() {
        let reporter = Reporter::default();
        assert_eq!(reporter.format, OutputFormat::Console);
        assert!(reporter.show_passed);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = failing_report();

        Reporter::new(OutputFormat::JsonPretty)
            .write_to_file(&report, &path)
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["validation"]["passed"], serde_json::json!(false));
    }

    #[test]
    fn test_write_to_missing_directory_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let err = Reporter::new(OutputFormat::JsonPretty)
            .write_to_file(&passing_report(), &path)
            .unwrap_err();
        assert!(err.to_string().contains("report.json"));
    }
}
