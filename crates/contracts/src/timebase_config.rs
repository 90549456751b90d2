//! Timebase configuration contracts shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::AlignmentError;

/// Default rate for the nominal-rate provider (camera frame rate, Hz)
pub const DEFAULT_NOMINAL_RATE_HZ: f64 = 30.0;

/// Default sample rate of the external acquisition clock (Hz)
pub const DEFAULT_EXTERNAL_CLOCK_RATE_HZ: f64 = 30_000.0;

/// Clock source for the session reference timeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimebaseSource {
    /// Synthetic fixed-rate timestamps
    #[default]
    NominalRate,
    /// Hardware TTL pulse logs
    Ttl,
    /// High-rate external acquisition clock (stub)
    #[serde(rename = "neuropixels", alias = "external_clock")]
    ExternalClock,
}

impl TimebaseSource {
    /// Serialized name, as written to sidecars
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NominalRate => "nominal_rate",
            Self::Ttl => "ttl",
            Self::ExternalClock => "neuropixels",
        }
    }
}

impl fmt::Display for TimebaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimebaseSource {
    type Err = AlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nominal_rate" => Ok(Self::NominalRate),
            "ttl" => Ok(Self::Ttl),
            "external_clock" | "neuropixels" => Ok(Self::ExternalClock),
            other => Err(AlignmentError::provider(
                other,
                "unrecognized timebase source (expected nominal_rate, ttl or external_clock)",
            )),
        }
    }
}

/// Strategy for projecting sample times onto the reference timeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    /// Assign each sample to the closest reference tick
    #[default]
    Nearest,
    /// Bracketing pair with interpolation weights
    Linear,
}

impl MappingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
        }
    }
}

impl fmt::Display for MappingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session timebase configuration
///
/// Conditional fields (`ttl_id`, `external_clock_stream`) are checked when the
/// configuration is loaded; by the time the engine runs the record is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TimebaseConfiguration {
    /// Clock source
    #[serde(default)]
    pub source: TimebaseSource,

    /// Mapping strategy
    #[serde(default)]
    pub mapping: MappingStrategy,

    /// Maximum tolerable timing error (seconds)
    #[validate(range(min = 0.0))]
    pub jitter_budget_s: f64,

    /// Constant correction added to every reference timestamp (seconds)
    #[serde(default)]
    pub offset_s: f64,

    /// Pulse-log clock identifier (required iff source = ttl)
    #[serde(default)]
    pub ttl_id: Option<String>,

    /// External clock stream identifier (required iff source = external_clock)
    #[serde(default)]
    pub external_clock_stream: Option<String>,

    /// Rate for the nominal-rate provider (Hz)
    #[serde(default = "default_nominal_rate_hz")]
    #[validate(range(exclusive_min = 0.0))]
    pub nominal_rate_hz: f64,

    /// Sample rate of the external clock stub (Hz)
    #[serde(default = "default_external_clock_rate_hz")]
    #[validate(range(exclusive_min = 0.0))]
    pub external_clock_rate_hz: f64,

    /// Whether alignment aborts when the budget is exceeded
    #[serde(default = "default_enforce_budget")]
    pub enforce_budget: bool,
}

fn default_nominal_rate_hz() -> f64 {
    DEFAULT_NOMINAL_RATE_HZ
}

fn default_external_clock_rate_hz() -> f64 {
    DEFAULT_EXTERNAL_CLOCK_RATE_HZ
}

fn default_enforce_budget() -> bool {
    true
}

impl Default for TimebaseConfiguration {
    fn default() -> Self {
        Self {
            source: TimebaseSource::NominalRate,
            mapping: MappingStrategy::Nearest,
            jitter_budget_s: 0.0,
            offset_s: 0.0,
            ttl_id: None,
            external_clock_stream: None,
            nominal_rate_hz: DEFAULT_NOMINAL_RATE_HZ,
            external_clock_rate_hz: DEFAULT_EXTERNAL_CLOCK_RATE_HZ,
            enforce_budget: true,
        }
    }
}
