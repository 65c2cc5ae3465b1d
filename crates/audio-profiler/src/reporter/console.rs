//! Console reporter for profile reports
//!
//! Provides human-readable output with a statistics table and status markers.

use anyhow::Result;
use std::fmt::Write;

use crate::runner::{display_value, ProfileReport};
use crate::stats::SeriesStatistics;
use crate::validation::{Severity, Verdict};

const RULE: &str = "════════════════════════════════════════════════════════════════";

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a report for console output.
    ///
    /// `show_passed` controls the `[CHECKS PASSED]` section.
    pub fn format(report: &ProfileReport, show_passed: bool) -> Result<String> {
        let mut output = String::new();

        // Header
        writeln!(output)?;
        writeln!(output, "{}", RULE)?;
        writeln!(output, "AUDIO PERFORMANCE REPORT")?;
        writeln!(output, "{}", RULE)?;

        // Metadata
        let metadata = &report.metadata;
        writeln!(output)?;
        writeln!(output, "[METADATA]")?;
        writeln!(output, "  timestamp:         {}", display_value(&metadata.timestamp))?;
        writeln!(output, "  unity_version:     {}", display_value(&metadata.unity_version))?;
        writeln!(output, "  platform:          {}", display_value(&metadata.platform))?;
        writeln!(output, "  sample_count:      {}", display_value(&metadata.sample_count))?;
        writeln!(output, "  total_duration:    {}", display_value(&metadata.total_duration))?;
        writeln!(output, "  sampling_interval: {}", display_value(&metadata.sampling_interval))?;

        // Statistics
        writeln!(output)?;
        writeln!(output, "[STATISTICS]")?;
        writeln!(output, "  ┌─────────────────┬─────────┬─────────┬─────────┬─────────┬─────────┬─────────┐")?;
        writeln!(output, "  │ Series          │   Min   │   Max   │   Avg   │ Median  │   P95   │   P99   │")?;
        writeln!(output, "  ├─────────────────┼─────────┼─────────┼─────────┼─────────┼─────────┼─────────┤")?;
        for (metric, stats) in report.statistics.iter() {
            Self::format_stats_row(&mut output, metric.key(), stats)?;
        }
        writeln!(output, "  └─────────────────┴─────────┴─────────┴─────────┴─────────┴─────────┴─────────┘")?;

        // Findings
        let findings = &report.findings;
        if show_passed {
            Self::format_section(&mut output, "[CHECKS PASSED]", "✓", findings.messages(Severity::Info))?;
        }
        Self::format_section(&mut output, "[WARNINGS]", "⚠", findings.messages(Severity::Warning))?;
        Self::format_section(&mut output, "[FAILURES]", "✗", findings.messages(Severity::Error))?;

        // Verdict
        writeln!(output)?;
        writeln!(output, "{}", RULE)?;
        match report.verdict() {
            Verdict::Pass => writeln!(output, "RESULT: PASS ✅")?,
            Verdict::Fail => writeln!(output, "RESULT: FAIL ❌")?,
        }
        writeln!(output, "{}", RULE)?;

        Ok(output)
    }

    fn format_section<'a>(
        output: &mut String,
        title: &str,
        marker: &str,
        messages: impl Iterator<Item = &'a str>,
    ) -> Result<()> {
        let mut messages = messages.peekable();
        if messages.peek().is_none() {
            return Ok(());
        }

        writeln!(output)?;
        writeln!(output, "{}", title)?;
        for message in messages {
            writeln!(output, "  {} {}", marker, message)?;
        }
        Ok(())
    }

    fn format_stats_row(output: &mut String, name: &str, stats: &SeriesStatistics) -> Result<()> {
        let bound = |v: f64| -> String {
            match stats.whole(v) {
                Some(n) => n.to_string(),
                None => format!("{:.2}", v),
            }
        };

        writeln!(
            output,
            "  │ {:<15} │ {:>7} │ {:>7} │ {:>7.2} │ {:>7.2} │ {:>7.2} │ {:>7.2} │",
            name,
            bound(stats.min),
            bound(stats.max),
            stats.avg,
            stats.median,
            stats.p95,
            stats.p99
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::test_support::{failing_report, passing_report};

    #[test]
    fn test_console_format_contains_metadata() {
        let output = ConsoleReporter::format(&passing_report(), true).unwrap();

        assert!(output.contains("[METADATA]"));
        assert!(output.contains("2022.3.10f1"));
        assert!(output.contains("Android"));
    }

    #[test]
    fn test_console_format_contains_statistics_table() {
        let output = ConsoleReporter::format(&passing_report(), true).unwrap();

        for key in ["fmod_cpu_dsp", "fmod_cpu_total", "voices", "unity_frame_ms"] {
            assert!(output.contains(key), "missing row {}", key);
        }
        assert!(output.contains("Median"));
        assert!(output.contains("P99"));
    }

    #[test]
    fn test_console_integral_bounds_have_no_decimals() {
        let output = ConsoleReporter::format(&passing_report(), true).unwrap();
        let voices_row = output.lines().find(|l| l.contains("voices")).unwrap();

        assert!(voices_row.contains("│      12 │      18 │"));
        assert!(voices_row.contains("15.00"));
    }

    #[test]
    fn test_console_format_shows_pass_status() {
        let output = ConsoleReporter::format(&passing_report(), true).unwrap();

        assert!(output.contains("RESULT: PASS"));
        assert!(output.contains("[CHECKS PASSED]"));
        assert!(output.contains("✓ FMOD DSP CPU max 6.00 <= 20.00"));
        assert!(!output.contains("[FAILURES]"));
    }

    #[test]
    fn test_console_format_shows_failures_and_warnings() {
        let output = ConsoleReporter::format(&failing_report(), true).unwrap();

        assert!(output.contains("RESULT: FAIL"));
        assert!(output.contains("✗ FMOD DSP CPU max 25.00 > 20.00"));
        assert!(output.contains("⚠ Voices avg 45.0 > 32"));
        assert!(output.contains("✗ Frame max 40.00ms > 33.0ms"));
    }

    #[test]
    fn test_console_quiet_hides_passed_checks() {
        let output = ConsoleReporter::format(&passing_report(), false).unwrap();

        assert!(!output.contains("[CHECKS PASSED]"));
        assert!(output.contains("RESULT: PASS"));
    }
}
