//! StatsSink trait - sidecar persistence interface
//!
//! Defines the abstract interface for alignment-stats writers.

use crate::{AlignmentError, AlignmentStats};

/// Alignment-stats output trait
///
/// Persistence is a side effect kept outside the pure alignment path; every
/// writer implements this trait so callers can inject a filesystem, log or
/// in-memory collaborator.
#[trait_variant::make(StatsSink: Send)]
pub trait LocalStatsSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one modality's alignment summary
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, modality: &str, stats: &AlignmentStats)
        -> Result<(), AlignmentError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), AlignmentError>;
}
