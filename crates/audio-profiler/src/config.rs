//! Threshold policy configuration
//!
//! The policy is a tree of limits, `subsystem -> category -> sub-metric ->
//! statistic`. The built-in policy ([`ThresholdPolicy::default`]) is complete;
//! an override document only needs the leaves it changes:
//!
//! ```json
//! { "fmod": { "cpu": { "dsp": { "max": 30.0 } }, "voices": { "avg": 48 } } }
//! ```
//!
//! Override documents are JSON or TOML, picked by file extension. The
//! conventional file name is [`THRESHOLDS_FILE_NAME`].

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::ThresholdError;

/// File name looked up next to the capture and next to the executable
pub const THRESHOLDS_FILE_NAME: &str = "audio_thresholds.json";

/// TOML variant of [`THRESHOLDS_FILE_NAME`], tried second
pub const THRESHOLDS_TOML_FILE_NAME: &str = "audio_thresholds.toml";

/// One limit value, remembering whether the source wrote it as an integer.
///
/// Messages print the limit the way it was written: `64` stays `64`, `33.0`
/// stays `33.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    value: f64,
    integer: bool,
}

impl Limit {
    pub fn float(value: f64) -> Self {
        Self {
            value,
            integer: false,
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            value: value as f64,
            integer: true,
        }
    }

    pub fn value(self) -> f64 {
        self.value
    }

    pub fn is_integer(self) -> bool {
        self.integer
    }
}

impl From<f64> for Limit {
    fn from(value: f64) -> Self {
        Limit::float(value)
    }
}

impl From<i32> for Limit {
    fn from(value: i32) -> Self {
        Limit::integer(i64::from(value))
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.integer {
            write!(f, "{}", self.value as i64)
        } else {
            // Shortest round-trip form, always with a fractional part
            write!(f, "{:?}", self.value)
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.integer {
            serializer.serialize_i64(self.value as i64)
        } else {
            serializer.serialize_f64(self.value)
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LimitVisitor;

        impl<'de> Visitor<'de> for LimitVisitor {
            type Value = Limit;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Limit, E> {
                Ok(Limit::integer(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Limit, E> {
                Ok(i64::try_from(v).map_or(Limit::float(v as f64), Limit::integer))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Limit, E> {
                Ok(Limit::float(v))
            }
        }

        deserializer.deserialize_any(LimitVisitor)
    }
}

/// Ceiling for the worst-case and typical value of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub max: Limit,
    pub avg: Limit,
}

impl Limits {
    pub fn new(max: impl Into<Limit>, avg: impl Into<Limit>) -> Self {
        Self {
            max: max.into(),
            avg: avg.into(),
        }
    }

    fn merge(self, overrides: &LimitOverrides) -> Self {
        Self {
            max: overrides.max.unwrap_or(self.max),
            avg: overrides.avg.unwrap_or(self.avg),
        }
    }
}

/// Mixer CPU limits, percent of the audio CPU budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuThresholds {
    pub dsp: Limits,
    pub stream: Limits,
    pub update: Limits,
    pub total: Limits,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FmodThresholds {
    pub cpu: CpuThresholds,
    /// Active voice count
    pub voices: Limits,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnityThresholds {
    /// Frame duration in milliseconds
    pub frame_ms: Limits,
}

/// Complete, resolved threshold policy.
///
/// Built once per run and passed to the validator by reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub fmod: FmodThresholds,
    pub unity: UnityThresholds,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            fmod: FmodThresholds {
                cpu: CpuThresholds {
                    dsp: Limits::new(20.0, 10.0),
                    stream: Limits::new(5.0, 2.0),
                    update: Limits::new(2.0, 1.0),
                    total: Limits::new(25.0, 15.0),
                },
                voices: Limits::new(64, 32),
            },
            unity: UnityThresholds {
                // ~30 FPS worst case, ~60 FPS typical
                frame_ms: Limits::new(33.0, 16.6),
            },
        }
    }
}

impl ThresholdPolicy {
    /// Apply an override document on top of this policy, leaf by leaf.
    pub fn with_overrides(self, overrides: &ThresholdOverrides) -> Self {
        let fmod = &overrides.fmod;
        let cpu = &fmod.cpu;
        Self {
            fmod: FmodThresholds {
                cpu: CpuThresholds {
                    dsp: self.fmod.cpu.dsp.merge(&cpu.dsp),
                    stream: self.fmod.cpu.stream.merge(&cpu.stream),
                    update: self.fmod.cpu.update.merge(&cpu.update),
                    total: self.fmod.cpu.total.merge(&cpu.total),
                },
                voices: self.fmod.voices.merge(&fmod.voices),
            },
            unity: UnityThresholds {
                frame_ms: self.unity.frame_ms.merge(&overrides.unity.frame_ms),
            },
        }
    }

    /// Read an override document and merge it onto the built-in policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown
    /// extension, or does not match the policy shape.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThresholdError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ThresholdError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let overrides = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ThresholdOverrides::from_json_str(&content),
            Some("toml") => ThresholdOverrides::from_toml_str(&content),
            _ => {
                return Err(ThresholdError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        }
        .map_err(|message| ThresholdError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        Ok(Self::default().with_overrides(&overrides))
    }
}

/// Optional leaf limits as they appear in an override document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitOverrides {
    pub max: Option<Limit>,
    pub avg: Option<Limit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuOverrides {
    pub dsp: LimitOverrides,
    pub stream: LimitOverrides,
    pub update: LimitOverrides,
    pub total: LimitOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmodOverrides {
    pub cpu: CpuOverrides,
    pub voices: LimitOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnityOverrides {
    pub frame_ms: LimitOverrides,
}

/// Partial threshold document; every path is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdOverrides {
    pub fmod: FmodOverrides,
    pub unity: UnityOverrides,
}

impl ThresholdOverrides {
    pub fn from_json_str(s: &str) -> Result<Self, String> {
        serde_json::from_str(s).map_err(|e| e.to_string())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| e.to_string())
    }
}

/// Where the policy of a run came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdSource {
    /// No override document found
    BuiltIn,
    /// Overrides read from this file
    File(PathBuf),
    /// An override document existed but could not be used
    Fallback { path: PathBuf, reason: String },
}

impl fmt::Display for ThresholdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdSource::BuiltIn => write!(f, "built-in defaults"),
            ThresholdSource::File(path) => write!(f, "{}", path.display()),
            ThresholdSource::Fallback { path, .. } => {
                write!(f, "built-in defaults ({} unusable)", path.display())
            }
        }
    }
}

/// Conventional override locations, in lookup order.
///
/// For each directory in `dirs`, the JSON name comes before the TOML name.
pub fn candidate_paths<I, P>(dirs: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    dirs.into_iter()
        .flat_map(|dir| {
            let dir = dir.as_ref();
            [
                dir.join(THRESHOLDS_FILE_NAME),
                dir.join(THRESHOLDS_TOML_FILE_NAME),
            ]
        })
        .collect()
}

/// Resolve the policy for a run from the first existing candidate.
///
/// Never fails: a missing document yields the built-in policy, an unusable
/// one yields the built-in policy plus a warning.
pub fn load_policy(candidates: &[PathBuf]) -> (ThresholdPolicy, ThresholdSource) {
    let Some(path) = candidates.iter().find(|p| p.exists()) else {
        info!("No thresholds file found, using defaults");
        if let Some(first) = candidates.first() {
            info!("To customize, create: {}", first.display());
        }
        return (ThresholdPolicy::default(), ThresholdSource::BuiltIn);
    };

    info!("Loading thresholds from: {}", path.display());
    match ThresholdPolicy::from_file(path) {
        Ok(policy) => {
            debug!(?policy, "thresholds resolved");
            (policy, ThresholdSource::File(path.clone()))
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            (
                ThresholdPolicy::default(),
                ThresholdSource::Fallback {
                    path: path.clone(),
                    reason: e.to_string(),
                },
            )
        }
    }
}
