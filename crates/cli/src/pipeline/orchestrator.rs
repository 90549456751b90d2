//! Session orchestrator - builds the timeline, aligns modalities, writes sidecars.
//!
//! The reference timeline is built once and shared behind an `Arc`. Modalities
//! are aligned concurrently on the blocking pool; the first failure aborts the
//! rest and nothing is written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{
    AlignmentStats, ModalityConfig, ReferenceTimeline, SampleSet, SessionBlueprint, StatsSink,
};
use sidecar::{FileStatsSink, LogStatsSink};
use timebase::{align_samples, create_alignment_stats, create_timebase_provider, parse_timestamps};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::SessionStats;
use crate::error::CliError;

/// Session run configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Loaded and validated session blueprint
    pub blueprint: SessionBlueprint,

    /// Path the blueprint was loaded from (error context)
    pub config_path: PathBuf,

    /// Apply the jitter budget gate
    pub enforce_budget: bool,

    /// Log sidecars instead of writing them
    pub dry_run: bool,
}

/// Build the session reference timeline from the configured provider
pub fn build_reference_timeline(blueprint: &SessionBlueprint) -> Result<ReferenceTimeline> {
    let timebase = &blueprint.timebase;
    let provider = create_timebase_provider(timebase, &blueprint.pulse_logs)
        .with_context(|| format!("Failed to select timebase provider (source={})", timebase.source))?;

    if provider.is_synthetic() {
        warn!(
            source = %timebase.source,
            "Reference timeline is synthetic; dropped frames cannot be detected"
        );
    }

    provider
        .get_timestamps(blueprint.session.frame_count)
        .with_context(|| {
            format!(
                "Failed to build reference timeline (source={}, frame_count={:?})",
                timebase.source, blueprint.session.frame_count
            )
        })
}

/// Main session orchestrator
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Run the session to completion
    #[instrument(
        name = "session_run",
        skip(self),
        fields(session = %self.config.blueprint.session.id)
    )]
    pub async fn run(self) -> Result<SessionStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        let timeline = {
            let blueprint = blueprint.clone();
            tokio::task::spawn_blocking(move || build_reference_timeline(&blueprint))
                .await
                .context("Timeline construction task failed")??
        };
        let timeline = Arc::new(timeline);
        info!(
            source = %blueprint.timebase.source,
            ticks = timeline.len(),
            start_s = timeline.start(),
            end_s = timeline.end(),
            "Reference timeline built"
        );

        let results = match self.align_all(Arc::clone(&timeline)).await {
            Ok(results) => results,
            Err(e) => {
                observability::record_aligned_session(blueprint.timebase.source, false);
                return Err(e);
            }
        };
        observability::record_aligned_session(blueprint.timebase.source, true);

        let mut stats = SessionStats {
            session_id: blueprint.session.id.clone(),
            timebase_source: blueprint.timebase.source,
            reference_len: timeline.len(),
            ..Default::default()
        };
        for (modality, record) in &results {
            observability::record_alignment_metrics(modality, record);
            stats.jitter.update(modality, record);
        }

        stats.sidecars = self.write_sidecars(&results).await?;
        stats.duration = start_time.elapsed();
        Ok(stats)
    }

    /// Align every modality concurrently; first error wins
    async fn align_all(
        &self,
        timeline: Arc<ReferenceTimeline>,
    ) -> Result<Vec<(String, AlignmentStats)>> {
        let blueprint = &self.config.blueprint;
        let mut tasks = JoinSet::new();
        let mut names = HashMap::new();

        for modality in &blueprint.modalities {
            let samples = load_samples(modality).await?;
            let timeline = Arc::clone(&timeline);
            let timebase = blueprint.timebase.clone();
            let enforce_budget = self.config.enforce_budget;

            let handle = tasks.spawn_blocking(move || {
                let outcome = align_samples(&samples.times, &timeline, &timebase, enforce_budget);
                let stats = outcome.map(|o| create_alignment_stats(&timebase, &o));
                (samples.modality, stats)
            });
            names.insert(handle.id(), modality.name.clone());
        }

        let mut results = Vec::with_capacity(blueprint.modalities.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            let (name, outcome) = match joined {
                Ok((_, pair)) => pair,
                Err(e) => {
                    tasks.abort_all();
                    let modality = names.get(&e.id()).map_or("<unknown>", String::as_str);
                    return Err(CliError::task(modality, e.to_string()).into());
                }
            };

            match outcome {
                Ok(record) => {
                    debug!(
                        modality = %name,
                        max_jitter_s = record.max_jitter_s,
                        p95_jitter_s = record.p95_jitter_s,
                        "Modality aligned"
                    );
                    results.push((name, record));
                }
                Err(e) => {
                    tasks.abort_all();
                    return Err(e).with_context(|| self.failure_context(&name));
                }
            }
        }

        // Stable output order
        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }

    async fn write_sidecars(&self, results: &[(String, AlignmentStats)]) -> Result<Vec<PathBuf>> {
        if self.config.dry_run {
            info!("Dry run mode - sidecars are logged, not written");
            let mut sink = LogStatsSink::new("dry_run");
            for (modality, record) in results {
                write_one(&mut sink, modality, record).await?;
            }
            return Ok(Vec::new());
        }

        let dir = &self.config.blueprint.output.sidecar_dir;
        let mut sink = FileStatsSink::new("sidecar", dir)
            .with_context(|| format!("Failed to prepare sidecar directory {}", dir.display()))?;
        for (modality, record) in results {
            write_one(&mut sink, modality, record).await?;
        }

        info!(dir = %dir.display(), count = sink.written().len(), "Sidecars written");
        Ok(sink.written().to_vec())
    }

    fn failure_context(&self, modality: &str) -> String {
        let timebase = &self.config.blueprint.timebase;
        format!(
            "Alignment failed for modality '{modality}' (source={}, mapping={}, jitter_budget_s={}, config={})",
            timebase.source,
            timebase.mapping,
            timebase.jitter_budget_s,
            self.config.config_path.display()
        )
    }
}

async fn write_one<S: StatsSink>(sink: &mut S, modality: &str, record: &AlignmentStats) -> Result<()> {
    let result = timebase::write_alignment_stats(sink, modality, record).await;
    observability::record_sidecar_written(sink.name(), result.is_ok());
    result.with_context(|| format!("Failed to write sidecar for modality '{modality}'"))
}

async fn load_samples(modality: &ModalityConfig) -> Result<SampleSet, CliError> {
    let path: &Path = &modality.samples;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::SampleRead {
            modality: modality.name.clone(),
            path: path.to_path_buf(),
            source,
        })?;

    let times = parse_timestamps(&content).map_err(|source| CliError::SampleParse {
        modality: modality.name.clone(),
        path: path.to_path_buf(),
        source,
    })?;
    debug!(modality = %modality.name, count = times.len(), "Samples loaded");
    Ok(SampleSet::new(&modality.name, times))
}
