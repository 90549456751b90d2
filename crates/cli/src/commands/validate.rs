//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{MappingStrategy, SessionBlueprint, TimebaseSource};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    session_id: String,
    timebase_source: TimebaseSource,
    mapping: MappingStrategy,
    jitter_budget_s: f64,
    modality_count: usize,
    pulse_log_files: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            let pulse_log_files = blueprint.pulse_logs.values().map(Vec::len).sum();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    session_id: blueprint.session.id.clone(),
                    timebase_source: blueprint.timebase.source,
                    mapping: blueprint.timebase.mapping,
                    jitter_budget_s: blueprint.timebase.jitter_budget_s,
                    modality_count: blueprint.modalities.len(),
                    pulse_log_files,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &SessionBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let timebase = &blueprint.timebase;

    match timebase.source {
        TimebaseSource::NominalRate => warnings.push(
            "nominal_rate timebase cannot detect dropped frames - prefer ttl when pulse logs exist"
                .to_string(),
        ),
        TimebaseSource::ExternalClock => warnings.push(
            "external_clock provider is a stub - timestamps are synthesized at the nominal rate"
                .to_string(),
        ),
        TimebaseSource::Ttl => {}
    }

    if timebase.source != TimebaseSource::Ttl && blueprint.session.frame_count.is_none() {
        warnings.push(format!(
            "session.frame_count is not set - the {} provider requires it at align time",
            timebase.source
        ));
    }

    if blueprint.modalities.is_empty() {
        warnings.push("No modalities configured - nothing will be aligned".to_string());
    }

    if !timebase.enforce_budget {
        warnings.push("timebase.enforce_budget = false - jitter is reported but not gated".to_string());
    }

    if timebase.jitter_budget_s == 0.0 && timebase.mapping == MappingStrategy::Nearest {
        warnings.push(
            "jitter_budget_s = 0 with nearest mapping - any off-tick sample fails the gate"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Session: {}", summary.session_id);
            println!("  Timebase: {} ({})", summary.timebase_source, summary.mapping);
            println!("  Jitter budget: {}s", summary.jitter_budget_s);
            println!("  Modalities: {}", summary.modality_count);
            println!("  Pulse-log files: {}", summary.pulse_log_files);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
