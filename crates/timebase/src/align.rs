//! Alignment orchestrator.
//!
//! Composes validation, mapping, jitter analysis and the budget gate into one
//! pure call. Persistence is delegated to a [`StatsSink`].

use contracts::{
    AlignmentError, AlignmentResult, AlignmentStats, JitterStatistics, MappingStrategy, StatsSink,
    TimebaseConfiguration,
};
use tracing::{debug, instrument};

use crate::budget::enforce_jitter_budget;
use crate::jitter::compute_jitter;
use crate::mapping::{map_validated, validate_samples};
use crate::search::validate_reference;

/// Output of one alignment call
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutcome {
    /// Per-sample mapping
    pub result: AlignmentResult,
    /// Residual statistics
    pub jitter: JitterStatistics,
    /// Strategy used
    pub mapping: MappingStrategy,
}

/// Align one modality's samples to the session reference.
///
/// Steps: validate the reference once, dispatch to the configured strategy,
/// compute jitter, and, if `enforce_budget`, apply the budget gate.
///
/// # Errors
/// - `InvalidReference` / `InvalidSample` on bad inputs
/// - `JitterBudgetExceeded` when gated and `max_jitter_s > jitter_budget_s`
#[instrument(
    name = "timebase_align_samples",
    skip(samples, reference, config),
    fields(
        samples = samples.len(),
        reference = reference.len(),
        mapping = %config.mapping,
        source = %config.source
    )
)]
pub fn align_samples(
    samples: &[f64],
    reference: &[f64],
    config: &TimebaseConfiguration,
    enforce_budget: bool,
) -> Result<AlignmentOutcome, AlignmentError> {
    validate_reference(reference)?;
    validate_samples(samples)?;

    let result = map_validated(samples, reference, config.mapping);
    let jitter = compute_jitter(&result);

    metrics::counter!("timebase_alignments_total", "mapping" => config.mapping.as_str())
        .increment(1);
    metrics::histogram!("timebase_max_jitter_s").record(jitter.max_jitter_s);
    metrics::histogram!("timebase_p95_jitter_s").record(jitter.p95_jitter_s);

    debug!(
        max_jitter_s = jitter.max_jitter_s,
        p95_jitter_s = jitter.p95_jitter_s,
        "alignment computed"
    );

    if enforce_budget {
        enforce_jitter_budget(&jitter, config.jitter_budget_s)?;
    }

    Ok(AlignmentOutcome {
        result,
        jitter,
        mapping: config.mapping,
    })
}

/// Package an outcome into the persisted summary record
pub fn create_alignment_stats(
    config: &TimebaseConfiguration,
    outcome: &AlignmentOutcome,
) -> AlignmentStats {
    AlignmentStats {
        timebase_source: config.source,
        mapping: outcome.mapping,
        offset_s: config.offset_s,
        max_jitter_s: outcome.jitter.max_jitter_s,
        p95_jitter_s: outcome.jitter.p95_jitter_s,
        aligned_samples: outcome.result.len(),
    }
}

/// Persist `stats` for `modality` through the injected sink
#[instrument(
    name = "timebase_write_alignment_stats",
    skip(sink, stats),
    fields(sink = %sink.name())
)]
pub async fn write_alignment_stats<S: StatsSink>(
    sink: &mut S,
    modality: &str,
    stats: &AlignmentStats,
) -> Result<(), AlignmentError> {
    sink.write(modality, stats).await?;
    sink.flush().await
}
