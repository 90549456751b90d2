//! `align` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::AlignArgs;
use crate::error::CliError;
use crate::pipeline::{Session, SessionConfig};

/// Execute the `align` command
pub async fn run_align(args: &AlignArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(ref output) = args.output {
        info!(output = %output.display(), "Overriding sidecar directory from CLI");
        blueprint.output.sidecar_dir = output.clone();
    }

    let enforce_budget = blueprint.timebase.enforce_budget && !args.no_enforce_budget;

    info!(
        session = %blueprint.session.id,
        source = %blueprint.timebase.source,
        mapping = %blueprint.timebase.mapping,
        jitter_budget_s = blueprint.timebase.jitter_budget_s,
        enforce_budget,
        modalities = blueprint.modalities.len(),
        "Configuration loaded"
    );

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let session = Session::new(SessionConfig {
        blueprint,
        config_path: args.config.clone(),
        enforce_budget,
        dry_run: args.dry_run,
    });

    let stats = session.run().await?;

    info!(
        session = %stats.session_id,
        modalities = stats.jitter.modalities.len(),
        sidecars = stats.sidecars.len(),
        duration_secs = stats.duration.as_secs_f64(),
        "Alignment completed successfully"
    );
    stats.print_summary();

    Ok(())
}
