//! `info` command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use contracts::{MappingStrategy, SessionBlueprint, TimebaseSource};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;
use crate::pipeline::build_reference_timeline;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    session: SessionSection,
    timebase: TimebaseSection,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pulse_logs: Vec<PulseLogInfo>,
    modalities: Vec<ModalityInfo>,
    sidecar_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeline: Option<TimelineInfo>,
}

#[derive(Serialize)]
struct SessionSection {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame_count: Option<usize>,
}

#[derive(Serialize)]
struct TimebaseSection {
    source: TimebaseSource,
    mapping: MappingStrategy,
    jitter_budget_s: f64,
    offset_s: f64,
    enforce_budget: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_clock_stream: Option<String>,
}

#[derive(Serialize)]
struct PulseLogInfo {
    clock_id: String,
    files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct ModalityInfo {
    name: String,
    samples: PathBuf,
}

#[derive(Serialize)]
struct TimelineInfo {
    ticks: usize,
    start_s: f64,
    end_s: f64,
    span_s: f64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let timeline = if args.timeline {
        let timeline = build_reference_timeline(&blueprint)?;
        Some(TimelineInfo {
            ticks: timeline.len(),
            start_s: timeline.start(),
            end_s: timeline.end(),
            span_s: timeline.span(),
        })
    } else {
        None
    };

    let info = build_config_info(&blueprint, timeline);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(blueprint: &SessionBlueprint, timeline: Option<TimelineInfo>) -> ConfigInfo {
    let timebase = &blueprint.timebase;

    let mut pulse_logs: Vec<PulseLogInfo> = blueprint
        .pulse_logs
        .iter()
        .map(|(clock_id, files)| PulseLogInfo {
            clock_id: clock_id.clone(),
            files: files.clone(),
        })
        .collect();
    pulse_logs.sort_by(|a, b| a.clock_id.cmp(&b.clock_id));

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        session: SessionSection {
            id: blueprint.session.id.clone(),
            frame_count: blueprint.session.frame_count,
        },
        timebase: TimebaseSection {
            source: timebase.source,
            mapping: timebase.mapping,
            jitter_budget_s: timebase.jitter_budget_s,
            offset_s: timebase.offset_s,
            enforce_budget: timebase.enforce_budget,
            ttl_id: timebase.ttl_id.clone(),
            external_clock_stream: timebase.external_clock_stream.clone(),
        },
        pulse_logs,
        modalities: blueprint
            .modalities
            .iter()
            .map(|m| ModalityInfo {
                name: m.name.clone(),
                samples: m.samples.clone(),
            })
            .collect(),
        sidecar_dir: blueprint.output.sidecar_dir.clone(),
        timeline,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("=== Session Configuration ===\n");

    println!("Session");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Id: {}", info.session.id);
    match info.session.frame_count {
        Some(count) => println!("   └─ Frame count: {}", count),
        None => println!("   └─ Frame count: (not set)"),
    }

    let tb = &info.timebase;
    println!("\nTimebase");
    println!("   ├─ Source: {}", tb.source);
    if let Some(ref ttl_id) = tb.ttl_id {
        println!("   ├─ TTL id: {}", ttl_id);
    }
    if let Some(ref stream) = tb.external_clock_stream {
        println!("   ├─ Clock stream: {} (stub)", stream);
    }
    println!("   ├─ Mapping: {}", tb.mapping);
    println!("   ├─ Offset: {}s", tb.offset_s);
    println!(
        "   └─ Jitter budget: {}s ({})",
        tb.jitter_budget_s,
        if tb.enforce_budget { "enforced" } else { "report only" }
    );

    if !info.pulse_logs.is_empty() {
        println!("\nPulse logs");
        for (i, log) in info.pulse_logs.iter().enumerate() {
            let prefix = if i + 1 == info.pulse_logs.len() { "└─" } else { "├─" };
            println!("   {} {} ({} files)", prefix, log.clock_id, log.files.len());
        }
    }

    println!("\nModalities ({})", info.modalities.len());
    for (i, modality) in info.modalities.iter().enumerate() {
        let prefix = if i + 1 == info.modalities.len() { "└─" } else { "├─" };
        println!("   {} {} <- {}", prefix, modality.name, modality.samples.display());
    }

    println!("\nSidecars -> {}", info.sidecar_dir.display());

    if let Some(ref timeline) = info.timeline {
        println!("\nReference timeline");
        println!("   ├─ Ticks: {}", timeline.ticks);
        println!("   ├─ Start: {:.6}s", timeline.start_s);
        println!("   ├─ End: {:.6}s", timeline.end_s);
        println!("   └─ Span: {:.6}s", timeline.span_s);
    }

    println!();
}
