//! Alignment outputs
//!
//! Per-sample mapping results, jitter statistics and the persisted summary record.

use serde::{Deserialize, Serialize};

use crate::{MappingStrategy, TimebaseSource};

/// Bracketing pair of reference indices with interpolation weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// (lower, upper) reference indices
    pub indices: (usize, usize),
    /// (lower weight, upper weight), summing to 1
    pub weights: (f64, f64),
}

impl Bracket {
    /// Reconstruct a time from the bracketing entries
    pub fn reconstruct(&self, reference: &[f64]) -> f64 {
        reference[self.indices.0] * self.weights.0 + reference[self.indices.1] * self.weights.1
    }
}

/// Per-sample assignment, one variant per mapping strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mapping", content = "assignments", rename_all = "snake_case")]
pub enum Alignment {
    /// One reference index per sample
    Nearest(Vec<usize>),
    /// One bracketing pair per sample
    Linear(Vec<Bracket>),
}

/// Result of mapping one sample sequence onto a reference timeline
///
/// Transient: created per alignment call and summarized into [`AlignmentStats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Per-sample assignments
    pub alignment: Alignment,
    /// Per-sample residual timing error (seconds, non-negative)
    pub residuals: Vec<f64>,
}

impl AlignmentResult {
    /// Strategy that produced this result
    pub fn mapping(&self) -> MappingStrategy {
        match self.alignment {
            Alignment::Nearest(_) => MappingStrategy::Nearest,
            Alignment::Linear(_) => MappingStrategy::Linear,
        }
    }

    /// Number of aligned samples
    pub fn len(&self) -> usize {
        self.residuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residuals.is_empty()
    }

    /// Nearest-mode indices, if this is a nearest result
    pub fn indices(&self) -> Option<&[usize]> {
        match &self.alignment {
            Alignment::Nearest(indices) => Some(indices),
            Alignment::Linear(_) => None,
        }
    }

    /// Linear-mode brackets, if this is a linear result
    pub fn brackets(&self) -> Option<&[Bracket]> {
        match &self.alignment {
            Alignment::Linear(brackets) => Some(brackets),
            Alignment::Nearest(_) => None,
        }
    }
}

/// Residual timing error summary
///
/// Invariant: `max_jitter_s >= p95_jitter_s >= 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JitterStatistics {
    /// Worst-case residual (seconds)
    pub max_jitter_s: f64,
    /// 95th percentile residual (seconds)
    pub p95_jitter_s: f64,
}

/// Persisted per-modality alignment summary (sidecar record)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub timebase_source: TimebaseSource,
    pub mapping: MappingStrategy,
    pub offset_s: f64,
    pub max_jitter_s: f64,
    pub p95_jitter_s: f64,
    pub aligned_samples: usize,
}

/// Sidecar file name for a modality
///
/// Path separators in the modality name are replaced so the file always lands
/// directly in the output directory.
pub fn sidecar_file_name(modality: &str) -> String {
    let safe: String = modality
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{safe}_alignment_stats.json")
}
