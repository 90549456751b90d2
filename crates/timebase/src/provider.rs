//! Timebase providers.
//!
//! Each provider produces the session's [`ReferenceTimeline`] from one clock
//! source. The set is closed: selection is a single exhaustive match on
//! [`TimebaseSource`] in [`create_timebase_provider`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use contracts::{AlignmentError, ReferenceTimeline, TimebaseConfiguration, TimebaseSource};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Malformed line in a timestamp file
#[derive(Debug, Error, PartialEq)]
#[error("line {line}: cannot parse '{text}' as a finite timestamp")]
pub struct TimestampParseError {
    /// 1-based line number
    pub line: usize,
    /// Offending text (trimmed)
    pub text: String,
}

/// Parse one timestamp (seconds) per non-empty line
///
/// Surrounding whitespace is ignored; blank lines are skipped.
pub fn parse_timestamps(content: &str) -> Result<Vec<f64>, TimestampParseError> {
    content
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, text)| !text.is_empty())
        .map(|(line, text)| match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(TimestampParseError {
                line,
                text: text.to_string(),
            }),
        })
        .collect()
}

/// Fixed-rate synthetic timestamps: `offset_s + i / rate_hz`
///
/// Cannot detect dropped frames; the timeline is nominal, not measured.
#[derive(Debug, Clone, PartialEq)]
pub struct NominalRateProvider {
    pub rate_hz: f64,
    pub offset_s: f64,
}

impl NominalRateProvider {
    pub fn new(rate_hz: f64, offset_s: f64) -> Self {
        Self { rate_hz, offset_s }
    }

    pub fn get_timestamps(
        &self,
        requested_count: Option<usize>,
    ) -> Result<ReferenceTimeline, AlignmentError> {
        let count = requested_count.ok_or_else(|| {
            AlignmentError::provider(
                TimebaseSource::NominalRate.as_str(),
                "requested_count is required for synthetic timestamps",
            )
        })?;
        ReferenceTimeline::new(synthetic_ticks(count, self.rate_hz, self.offset_s))
    }
}

/// Reference timeline read from hardware TTL pulse logs
#[derive(Debug, Clone, PartialEq)]
pub struct PulseLogProvider {
    pub clock_id: String,
    pub files: Vec<PathBuf>,
    pub offset_s: f64,
}

impl PulseLogProvider {
    pub fn new(clock_id: impl Into<String>, files: Vec<PathBuf>, offset_s: f64) -> Self {
        Self {
            clock_id: clock_id.into(),
            files,
            offset_s,
        }
    }

    /// Load, concatenate and sort every pulse log, then apply the offset.
    ///
    /// `requested_count` is ignored: the length is whatever the hardware recorded.
    #[instrument(
        name = "pulse_log_load",
        skip(self, _requested_count),
        fields(clock_id = %self.clock_id, files = self.files.len())
    )]
    pub fn get_timestamps(
        &self,
        _requested_count: Option<usize>,
    ) -> Result<ReferenceTimeline, AlignmentError> {
        if self.files.is_empty() {
            return Err(self.error(format!(
                "no pulse-log files found for clock '{}'",
                self.clock_id
            )));
        }

        let mut pulses = Vec::new();
        for path in &self.files {
            let parsed = self.load_file(path)?;
            debug!(path = %path.display(), pulses = parsed.len(), "pulse log parsed");
            pulses.extend(parsed);
        }

        pulses.sort_by(f64::total_cmp);
        for t in &mut pulses {
            *t += self.offset_s;
        }

        info!(pulses = pulses.len(), "pulse-log timeline built");
        ReferenceTimeline::new(pulses)
    }

    fn load_file(&self, path: &Path) -> Result<Vec<f64>, AlignmentError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| self.error(format!("cannot read '{}': {e}", path.display())))?;
        parse_timestamps(&content).map_err(|e| self.error(format!("{}: {e}", path.display())))
    }

    fn error(&self, message: String) -> AlignmentError {
        AlignmentError::provider(TimebaseSource::Ttl.as_str(), message)
    }
}

/// High-rate external acquisition clock.
///
/// STUB: generates synthetic ticks at `rate_hz` and does not read the
/// acquisition stream. Do not treat its output as measured hardware timing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalClockProvider {
    pub stream_id: String,
    pub offset_s: f64,
    pub rate_hz: f64,
}

impl ExternalClockProvider {
    pub fn new(stream_id: impl Into<String>, offset_s: f64, rate_hz: f64) -> Self {
        Self {
            stream_id: stream_id.into(),
            offset_s,
            rate_hz,
        }
    }

    pub fn get_timestamps(
        &self,
        requested_count: Option<usize>,
    ) -> Result<ReferenceTimeline, AlignmentError> {
        warn!(
            stream_id = %self.stream_id,
            rate_hz = self.rate_hz,
            "external clock provider is a stub; timestamps are synthetic"
        );
        let count = requested_count.ok_or_else(|| {
            AlignmentError::provider(
                TimebaseSource::ExternalClock.as_str(),
                format!(
                    "requested_count is required for stream '{}' (stub provider)",
                    self.stream_id
                ),
            )
        })?;
        ReferenceTimeline::new(synthetic_ticks(count, self.rate_hz, self.offset_s))
    }
}

fn synthetic_ticks(count: usize, rate_hz: f64, offset_s: f64) -> Vec<f64> {
    (0..count).map(|i| offset_s + i as f64 / rate_hz).collect()
}

/// Closed set of timebase providers
#[derive(Debug, Clone, PartialEq)]
pub enum TimebaseProvider {
    NominalRate(NominalRateProvider),
    PulseLog(PulseLogProvider),
    ExternalClock(ExternalClockProvider),
}

impl TimebaseProvider {
    /// Clock source this provider reads
    pub fn source(&self) -> TimebaseSource {
        match self {
            Self::NominalRate(_) => TimebaseSource::NominalRate,
            Self::PulseLog(_) => TimebaseSource::Ttl,
            Self::ExternalClock(_) => TimebaseSource::ExternalClock,
        }
    }

    /// Whether the timestamps are synthetic rather than measured
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, Self::PulseLog(_))
    }

    /// Produce the reference timeline
    ///
    /// `requested_count` is the expected tick count (e.g. camera frames); the
    /// pulse-log provider ignores it.
    #[instrument(name = "timebase_get_timestamps", skip(self), fields(source = %self.source()))]
    pub fn get_timestamps(
        &self,
        requested_count: Option<usize>,
    ) -> Result<ReferenceTimeline, AlignmentError> {
        let timeline = match self {
            Self::NominalRate(p) => p.get_timestamps(requested_count),
            Self::PulseLog(p) => p.get_timestamps(requested_count),
            Self::ExternalClock(p) => p.get_timestamps(requested_count),
        }?;
        metrics::gauge!("timebase_reference_len", "source" => self.source().as_str())
            .set(timeline.len() as f64);
        Ok(timeline)
    }
}

/// Select the provider for `config.source`
///
/// `pulse_logs` maps clock identifiers to discovered pulse-log files.
///
/// # Errors
/// `TimebaseProvider` if the identifier required by the source is absent or,
/// for TTL, resolves to no files.
pub fn create_timebase_provider(
    config: &TimebaseConfiguration,
    pulse_logs: &HashMap<String, Vec<PathBuf>>,
) -> Result<TimebaseProvider, AlignmentError> {
    let provider = match config.source {
        TimebaseSource::NominalRate => TimebaseProvider::NominalRate(NominalRateProvider::new(
            config.nominal_rate_hz,
            config.offset_s,
        )),
        TimebaseSource::Ttl => {
            let clock_id = config.ttl_id.as_deref().ok_or_else(|| {
                AlignmentError::provider("ttl", "ttl_id is required when source = ttl")
            })?;
            let files = pulse_logs.get(clock_id).cloned().unwrap_or_default();
            if files.is_empty() {
                return Err(AlignmentError::provider(
                    "ttl",
                    format!("no pulse-log files found for ttl_id '{clock_id}'"),
                ));
            }
            TimebaseProvider::PulseLog(PulseLogProvider::new(clock_id, files, config.offset_s))
        }
        TimebaseSource::ExternalClock => {
            let stream_id = config.external_clock_stream.as_deref().ok_or_else(|| {
                AlignmentError::provider(
                    TimebaseSource::ExternalClock.as_str(),
                    "external_clock_stream is required when source = external_clock",
                )
            })?;
            TimebaseProvider::ExternalClock(ExternalClockProvider::new(
                stream_id,
                config.offset_s,
                config.external_clock_rate_hz,
            ))
        }
    };

    Ok(provider)
}
