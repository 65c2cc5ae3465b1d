//! Threshold validation
//!
//! Runs the fixed check plan against a run's statistics. CPU checks record
//! every comparison, passed ones as info; voices and frame time checks only
//! record exceedances. Ceiling breaches on worst-case values are errors and fail the
//! run; typical-load breaches for voices and frame time are warnings only.
//!
//! Plan, in output order:
//!
//! | # | Check                | Statistic | Exceeded |
//! |---|----------------------|-----------|----------|
//! | 1 | FMOD DSP CPU         | max, avg  | error    |
//! | 2 | FMOD Stream CPU      | avg       | error    |
//! | 3 | FMOD Total CPU       | max       | error    |
//! | 4 | Voices               | avg       | warning  |
//! |   |                      | max       | error    |
//! | 5 | Frame time           | avg       | warning  |
//! |   |                      | max       | error    |

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{Limit, ThresholdPolicy};
use crate::samples::Metric;
use crate::stats::RunStatistics;

/// Classification of a single check outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Check passed
    Info,
    /// Soft exceedance, does not affect the verdict
    Warning,
    /// Hard exceedance, fails the run
    Error,
}

/// One classified threshold comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn new(severity: Severity, message: String) -> Self {
        Self { severity, message }
    }
}

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Findings of a validation pass, in check-plan order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    findings: Vec<Finding>,
}

impl ValidationResult {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Messages of the given severity, in order
    pub fn messages(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .filter(move |f| f.severity == severity)
            .map(|f| f.message.as_str())
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Severity::Error).map(str::to_owned).collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Severity::Warning).map(str::to_owned).collect()
    }

    pub fn has_failures(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn verdict(&self) -> Verdict {
        if self.has_failures() {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }

    fn push(&mut self, severity: Severity, message: String) {
        debug!(?severity, %message, "finding");
        self.findings.push(Finding::new(severity, message));
    }

    /// Hard ceiling on a CPU statistic, two-decimal formatting.
    fn check_ceiling(&mut self, name: &str, stat: &str, value: f64, limit: Limit) {
        let limit = limit.value();
        if value > limit {
            self.push(
                Severity::Error,
                format!("{} {} {:.2} > {:.2}", name, stat, value, limit),
            );
        } else {
            self.push(
                Severity::Info,
                format!("{} {} {:.2} <= {:.2}", name, stat, value, limit),
            );
        }
    }

    /// Records a finding only when `value` exceeds `limit`.
    fn check_exceeded(
        &mut self,
        severity: Severity,
        value: f64,
        limit: Limit,
        message: impl FnOnce() -> String,
    ) {
        if value > limit.value() {
            self.push(severity, message());
        }
    }
}

/// Validate run statistics against a policy.
///
/// # Examples
///
/// ```
/// use audio_profiler::config::ThresholdPolicy;
/// use audio_profiler::samples::{Capture, SeriesSet};
/// use audio_profiler::stats::RunStatistics;
/// use audio_profiler::validation::{validate, Verdict};
///
/// # fn example() -> audio_profiler::error::Result<()> {
/// let capture = Capture::from_json_str(
///     r#"{ "samples": [ { "fmodCpuDsp": 10 }, { "fmodCpuDsp": 25 }, { "fmodCpuDsp": 5 } ] }"#,
///     "inline.json",
/// )?;
/// let stats = RunStatistics::from_series(&SeriesSet::collect(capture.samples()));
///
/// let result = validate(&stats, &ThresholdPolicy::default());
/// assert_eq!(result.verdict(), Verdict::Fail);
/// assert_eq!(result.errors()[0], "FMOD DSP CPU max 25.00 > 20.00");
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all)]
pub fn validate(stats: &RunStatistics, policy: &ThresholdPolicy) -> ValidationResult {
    let mut result = ValidationResult::default();
    let cpu = &policy.fmod.cpu;

    let dsp = stats.get(Metric::FmodCpuDsp);
    result.check_ceiling("FMOD DSP CPU", "max", dsp.max, cpu.dsp.max);
    result.check_ceiling("FMOD DSP CPU", "avg", dsp.avg, cpu.dsp.avg);

    let stream = stats.get(Metric::FmodCpuStream);
    result.check_ceiling("FMOD Stream CPU", "avg", stream.avg, cpu.stream.avg);

    let total = stats.get(Metric::FmodCpuTotal);
    result.check_ceiling("FMOD Total CPU", "max", total.max, cpu.total.max);

    let voices = stats.get(Metric::Voices);
    let limits = policy.fmod.voices;
    result.check_exceeded(Severity::Warning, voices.avg, limits.avg, || {
        format!("Voices avg {:.1} > {}", voices.avg, limits.avg)
    });
    result.check_exceeded(Severity::Error, voices.max, limits.max, || {
        format!("Voices max {} > {}", voices.max, limits.max)
    });

    let frame = stats.get(Metric::UnityFrameMs);
    let limits = policy.unity.frame_ms;
    result.check_exceeded(Severity::Warning, frame.avg, limits.avg, || {
        format!("Frame avg {:.2}ms > {}ms", frame.avg, limits.avg)
    });
    result.check_exceeded(Severity::Error, frame.max, limits.max, || {
        format!("Frame max {:.2}ms > {}ms", frame.max, limits.max)
    });

    result
}
