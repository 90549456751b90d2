//! Alignment metrics
//!
//! Records per-modality alignment results through the `metrics` facade and
//! aggregates them in memory for the end-of-run report.

use std::collections::BTreeMap;
use std::fmt;

use contracts::{AlignmentStats, MappingStrategy, TimebaseSource};
use metrics::{counter, gauge};

/// Record metrics for one aligned modality
///
/// Call once per `AlignmentStats` produced.
pub fn record_alignment_metrics(modality: &str, stats: &AlignmentStats) {
    gauge!("timebase_modality_max_jitter_s", "modality" => modality.to_string())
        .set(stats.max_jitter_s);
    gauge!("timebase_modality_p95_jitter_s", "modality" => modality.to_string())
        .set(stats.p95_jitter_s);
    counter!("timebase_aligned_samples_total", "modality" => modality.to_string())
        .increment(stats.aligned_samples as u64);
}

/// Record one sidecar write attempt
pub fn record_sidecar_written(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "timebase_sidecars_written_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record a completed session
pub fn record_aligned_session(source: TimebaseSource, passed: bool) {
    let status = if passed { "passed" } else { "failed" };
    counter!(
        "timebase_sessions_total",
        "source" => source.as_str(),
        "status" => status
    )
    .increment(1);
}

/// Jitter aggregator
///
/// Collects per-modality stats plus running statistics across modalities.
#[derive(Debug, Clone, Default)]
pub struct JitterAggregator {
    pub total_samples: u64,
    pub max_jitter: RunningStats,
    pub p95_jitter: RunningStats,
    pub modalities: BTreeMap<String, ModalitySummary>,
}

/// Summary line for one modality
#[derive(Debug, Clone, PartialEq)]
pub struct ModalitySummary {
    pub mapping: MappingStrategy,
    pub aligned_samples: usize,
    pub max_jitter_s: f64,
    pub p95_jitter_s: f64,
}

impl JitterAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, modality: &str, stats: &AlignmentStats) {
        self.total_samples += stats.aligned_samples as u64;
        self.max_jitter.push(stats.max_jitter_s);
        self.p95_jitter.push(stats.p95_jitter_s);
        self.modalities.insert(
            modality.to_string(),
            ModalitySummary {
                mapping: stats.mapping,
                aligned_samples: stats.aligned_samples,
                max_jitter_s: stats.max_jitter_s,
                p95_jitter_s: stats.p95_jitter_s,
            },
        );
    }

    /// Worst modality by max jitter
    pub fn worst(&self) -> Option<(&str, &ModalitySummary)> {
        self.modalities
            .iter()
            .max_by(|a, b| a.1.max_jitter_s.total_cmp(&b.1.max_jitter_s))
            .map(|(name, summary)| (name.as_str(), summary))
    }

    pub fn summary(&self) -> JitterSummary {
        JitterSummary {
            modality_count: self.modalities.len(),
            total_samples: self.total_samples,
            max_jitter_s: StatsSummary::from(&self.max_jitter),
            p95_jitter_s: StatsSummary::from(&self.p95_jitter),
            worst_modality: self.worst().map(|(name, _)| name.to_string()),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Session-level summary
#[derive(Debug, Clone, Default)]
pub struct JitterSummary {
    pub modality_count: usize,
    pub total_samples: u64,
    pub max_jitter_s: StatsSummary,
    pub p95_jitter_s: StatsSummary,
    pub worst_modality: Option<String>,
}

impl fmt::Display for JitterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Alignment Summary ===")?;
        writeln!(f, "Modalities: {}", self.modality_count)?;
        writeln!(f, "Aligned samples: {}", self.total_samples)?;
        writeln!(f, "Max jitter (s): {}", self.max_jitter_s)?;
        writeln!(f, "P95 jitter (s): {}", self.p95_jitter_s)?;
        if let Some(worst) = &self.worst_modality {
            writeln!(f, "Worst modality: {worst}")?;
        }
        Ok(())
    }
}

/// Statistics snapshot
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.6}, max={:.6}, mean={:.6}, std={:.6} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
