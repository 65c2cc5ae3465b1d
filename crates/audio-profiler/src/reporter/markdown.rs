//! Markdown reporter, for CI job summaries

use anyhow::Result;
use std::fmt::Write;

use crate::runner::{display_value, ProfileReport};
use crate::validation::{Severity, Verdict};

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn format(report: &ProfileReport, show_passed: bool) -> Result<String> {
        let mut output = String::new();
        let metadata = &report.metadata;

        let badge = match report.verdict() {
            Verdict::Pass => "✅ PASS",
            Verdict::Fail => "❌ FAIL",
        };
        writeln!(output, "# Audio Performance Report: {}", badge)?;
        writeln!(output)?;
        writeln!(
            output,
            "Platform **{}**, Unity {}, {} samples over {}s (captured {})",
            display_value(&metadata.platform),
            display_value(&metadata.unity_version),
            display_value(&metadata.sample_count),
            display_value(&metadata.total_duration),
            display_value(&metadata.timestamp)
        )?;
        writeln!(output)?;

        writeln!(output, "## Statistics")?;
        writeln!(output)?;
        writeln!(output, "| Series | Min | Max | Avg | Median | P95 | P99 |")?;
        writeln!(output, "|--------|----:|----:|----:|-------:|----:|----:|")?;
        for (metric, stats) in report.statistics.iter() {
            let bound = |v: f64| match stats.whole(v) {
                Some(n) => n.to_string(),
                None => format!("{:.2}", v),
            };
            let (min, max) = (bound(stats.min), bound(stats.max));
            writeln!(
                output,
                "| `{}` | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} |",
                metric.key(),
                min,
                max,
                stats.avg,
                stats.median,
                stats.p95,
                stats.p99
            )?;
        }

        let sections = [
            (Severity::Error, "Failures"),
            (Severity::Warning, "Warnings"),
            (Severity::Info, "Checks passed"),
        ];
        for (severity, title) in sections {
            if severity == Severity::Info && !show_passed {
                continue;
            }
            let mut messages = report.findings.messages(severity).peekable();
            if messages.peek().is_none() {
                continue;
            }
            writeln!(output)?;
            writeln!(output, "## {}", title)?;
            writeln!(output)?;
            for message in messages {
                writeln!(output, "- {}", message)?;
            }
        }

        Ok(output)
    }
}
