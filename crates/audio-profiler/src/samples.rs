//! Profiler capture loading and per-metric series extraction
//!
//! A capture is the JSON document written by the in-engine audio profiler:
//! run metadata plus an ordered list of samples, one per sampling tick.
//! Each sample is a loose JSON object; fields the collector cares about are
//! listed in [`Metric`].
//!
//! # Example
//!
//! ```
//! use audio_profiler::samples::{Capture, Metric, SeriesSet};
//!
//! # fn example() -> audio_profiler::error::Result<()> {
//! let json = r#"{ "samples": [ { "fmodCpuDsp": 4.5, "voices": 12 }, { "fmodCpuDsp": 6.0 } ] }"#;
//! let capture = Capture::from_json_str(json, "inline.json")?;
//!
//! let series = SeriesSet::collect(capture.samples());
//! assert_eq!(series.get(Metric::FmodCpuDsp), &[4.5, 6.0]);
//! assert_eq!(series.get(Metric::Voices), &[12.0, 0.0]);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProfilerError, Result};

/// Raw profiler output as written by the capture tool.
///
/// Metadata is echoed, not interpreted, so any JSON value is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDocument {
    /// Capture start time, free-form
    pub timestamp: Option<Value>,
    /// Engine version the capture was taken with
    pub unity_version: Option<Value>,
    /// Target platform name
    pub platform: Option<Value>,
    /// Sample count as reported by the capture tool
    pub sample_count: Option<Value>,
    /// Capture length in seconds
    pub total_duration: Option<Value>,
    /// Seconds between samples
    pub sampling_interval: Option<Value>,
    /// Per-tick samples in capture order; `null` reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub samples: Vec<Sample>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Sample>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Sample>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One observation point: metric name to value.
///
/// Unknown fields are kept but ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(Map<String, Value>);

impl Sample {
    /// Value of `field`, or `0.0` when the field is absent or not a number.
    pub fn value(&self, field: &str) -> f64 {
        self.0.get(field).and_then(Value::as_f64).unwrap_or(0.0)
    }
}

impl From<Map<String, Value>> for Sample {
    fn from(map: Map<String, Value>) -> Self {
        Sample(map)
    }
}

/// The metrics extracted from every sample, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    FmodCpuDsp,
    FmodCpuStream,
    FmodCpuUpdate,
    FmodCpuTotal,
    Voices,
    UnityFrameMs,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::FmodCpuDsp,
        Metric::FmodCpuStream,
        Metric::FmodCpuUpdate,
        Metric::FmodCpuTotal,
        Metric::Voices,
        Metric::UnityFrameMs,
    ];

    /// Field name inside a capture sample
    pub fn field(self) -> &'static str {
        match self {
            Metric::FmodCpuDsp => "fmodCpuDsp",
            Metric::FmodCpuStream => "fmodCpuStream",
            Metric::FmodCpuUpdate => "fmodCpuUpdate",
            Metric::FmodCpuTotal => "totalFmodCpu",
            Metric::Voices => "voices",
            Metric::UnityFrameMs => "unityFrameMs",
        }
    }

    /// Series name used in reports
    pub fn key(self) -> &'static str {
        match self {
            Metric::FmodCpuDsp => "fmod_cpu_dsp",
            Metric::FmodCpuStream => "fmod_cpu_stream",
            Metric::FmodCpuUpdate => "fmod_cpu_update",
            Metric::FmodCpuTotal => "fmod_cpu_total",
            Metric::Voices => "voices",
            Metric::UnityFrameMs => "unity_frame_ms",
        }
    }

    /// Whether the series holds counts rather than measurements
    pub fn is_integral(self) -> bool {
        matches!(self, Metric::Voices)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A capture that is known to contain at least one sample
#[derive(Debug, Clone)]
pub struct Capture {
    path: PathBuf,
    document: MetricsDocument,
}

impl Capture {
    /// Load and validate a capture file.
    ///
    /// # Errors
    ///
    /// - [`ProfilerError::MetricsNotFound`] if `path` does not exist
    /// - [`ProfilerError::MetricsRead`] if the file cannot be read
    /// - [`ProfilerError::MalformedMetrics`] if the content is not a capture document
    /// - [`ProfilerError::NoSamples`] if the sample list is empty
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProfilerError::MetricsNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ProfilerError::MetricsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content, path)
    }

    /// Parse a capture from a JSON string. `path` is only used in error messages.
    pub fn from_json_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self> {
        let path = path.as_ref();
        let document: MetricsDocument =
            serde_json::from_str(s).map_err(|source| ProfilerError::MalformedMetrics {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(document, path)
    }

    /// Wrap an already parsed document.
    pub fn new<P: AsRef<Path>>(document: MetricsDocument, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if document.samples.is_empty() {
            return Err(ProfilerError::NoSamples { path });
        }
        debug!(samples = document.samples.len(), path = %path.display(), "capture loaded");
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &MetricsDocument {
        &self.document
    }

    /// Never empty.
    pub fn samples(&self) -> &[Sample] {
        &self.document.samples
    }
}

/// One series per [`Metric`], all the same length as the sample list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    series: [Vec<f64>; 6],
}

impl SeriesSet {
    /// Extract every metric from every sample, keeping sample order.
    pub fn collect(samples: &[Sample]) -> Self {
        let mut series: [Vec<f64>; 6] = Default::default();
        for values in series.iter_mut() {
            values.reserve_exact(samples.len());
        }

        for sample in samples {
            for metric in Metric::ALL {
                series[metric.index()].push(sample.value(metric.field()));
            }
        }

        Self { series }
    }

    pub fn get(&self, metric: Metric) -> &[f64] {
        &self.series[metric.index()]
    }

    /// Number of samples each series was built from
    pub fn len(&self) -> usize {
        self.series[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(value: Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let s = sample(json!({ "fmodCpuDsp": 3.5 }));
        assert_eq!(s.value("fmodCpuDsp"), 3.5);
        assert_eq!(s.value("voices"), 0.0);
    }

    #[test]
    fn test_non_numeric_fields_default_to_zero() {
        let s = sample(json!({ "voices": "many", "unityFrameMs": null }));
        assert_eq!(s.value("voices"), 0.0);
        assert_eq!(s.value("unityFrameMs"), 0.0);
    }

    #[test]
    fn test_collect_preserves_order_and_length() {
        let samples = vec![
            sample(json!({ "fmodCpuDsp": 10, "voices": 3, "totalFmodCpu": 12.5 })),
            sample(json!({ "fmodCpuDsp": 25 })),
            sample(json!({ "fmodCpuDsp": 5, "unityFrameMs": 16.0 })),
        ];

        let series = SeriesSet::collect(&samples);
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(Metric::FmodCpuDsp), &[10.0, 25.0, 5.0]);
        assert_eq!(series.get(Metric::Voices), &[3.0, 0.0, 0.0]);
        assert_eq!(series.get(Metric::FmodCpuTotal), &[12.5, 0.0, 0.0]);
        assert_eq!(series.get(Metric::UnityFrameMs), &[0.0, 0.0, 16.0]);
        for metric in Metric::ALL {
            assert_eq!(series.get(metric).len(), 3);
        }
    }

    #[test]
    fn test_collect_empty() {
        let series = SeriesSet::collect(&[]);
        assert!(series.is_empty());
    }

    #[test]
    fn test_capture_rejects_empty_samples() {
        let err = Capture::from_json_str(r#"{ "samples": [] }"#, "run.json").unwrap_err();
        assert!(matches!(err, ProfilerError::NoSamples { .. }));

        let err = Capture::from_json_str(r#"{ "platform": "PS5" }"#, "run.json").unwrap_err();
        assert!(matches!(err, ProfilerError::NoSamples { .. }));
    }

    #[test]
    fn test_null_samples_is_no_samples() {
        let err = Capture::from_json_str(r#"{ "samples": null }"#, "run.json").unwrap_err();
        assert!(matches!(err, ProfilerError::NoSamples { .. }));
        assert!(err.to_string().starts_with("No samples found"));
    }

    #[test]
    fn test_metadata_of_any_type_is_accepted() {
        let json = r#"{
            "timestamp": 1714560000,
            "platform": { "name": "PS5" },
            "sampleCount": 3.0,
            "totalDuration": "90s",
            "samples": [ { "voices": 4 } ]
        }"#;

        let capture = Capture::from_json_str(json, "run.json").unwrap();
        let doc = capture.document();
        assert_eq!(doc.timestamp, Some(json!(1714560000)));
        assert_eq!(doc.platform, Some(json!({ "name": "PS5" })));
        assert_eq!(doc.sample_count, Some(json!(3.0)));
        assert_eq!(doc.total_duration, Some(json!("90s")));
        assert_eq!(doc.unity_version, None);
    }

    #[test]
    fn test_capture_rejects_malformed_json() {
        let err = Capture::from_json_str("not json", "run.json").unwrap_err();
        assert!(matches!(err, ProfilerError::MalformedMetrics { .. }));
    }

    #[test]
    fn test_capture_reads_metadata() {
        let json = r#"{
            "timestamp": "2024-05-01T10:00:00Z",
            "unityVersion": "2022.3.10f1",
            "platform": "Android",
            "sampleCount": 2,
            "totalDuration": 1.5,
            "samplingInterval": 0.5,
            "samples": [ { "voices": 4 }, { "voices": 8 } ]
        }"#;

        let capture = Capture::from_json_str(json, "run.json").unwrap();
        let doc = capture.document();
        assert_eq!(doc.unity_version, Some(json!("2022.3.10f1")));
        assert_eq!(doc.platform, Some(json!("Android")));
        assert_eq!(doc.sample_count, Some(json!(2)));
        assert_eq!(doc.sampling_interval, Some(json!(0.5)));
        assert_eq!(capture.samples().len(), 2);
        assert_eq!(capture.path(), Path::new("run.json"));
    }

    #[test]
    fn test_metric_keys_and_fields() {
        assert_eq!(Metric::FmodCpuTotal.field(), "totalFmodCpu");
        assert_eq!(Metric::FmodCpuTotal.key(), "fmod_cpu_total");
        assert!(Metric::Voices.is_integral());
        assert!(!Metric::UnityFrameMs.is_integral());
    }
}
