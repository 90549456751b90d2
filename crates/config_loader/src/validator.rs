//! Configuration validation
//!
//! Rules:
//! - field ranges (`jitter_budget_s >= 0`, rates > 0) via `validator` derive
//! - `ttl_id` present iff source = ttl, and it names non-empty `pulse_logs`
//! - `external_clock_stream` present iff source = external_clock
//! - budget and rates finite (range checks let NaN through)
//! - modality names and sidecar file names unique, names non-empty
//! - session id non-empty

use std::collections::HashSet;

use contracts::{sidecar_file_name, AlignmentError, SessionBlueprint, TimebaseSource};
use validator::{Validate, ValidationErrors};

/// Validate a SessionBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SessionBlueprint) -> Result<(), AlignmentError> {
    validate_fields(blueprint)?;
    validate_finite(blueprint)?;
    validate_session(blueprint)?;
    validate_ttl(blueprint)?;
    validate_external_clock(blueprint)?;
    validate_modalities(blueprint)?;
    Ok(())
}

/// Field-level range checks declared on the contract types
fn validate_fields(blueprint: &SessionBlueprint) -> Result<(), AlignmentError> {
    blueprint.validate().map_err(|errors| first_field_error(&errors))
}

fn first_field_error(errors: &ValidationErrors) -> AlignmentError {
    // Flatten "timebase.jitter_budget_s" style paths from nested errors.
    let mut fields: Vec<String> = Vec::new();
    for (outer, inner) in errors.errors() {
        match inner {
            validator::ValidationErrorsKind::Struct(nested) => {
                for (field, _) in nested.field_errors() {
                    fields.push(format!("{outer}.{field}"));
                }
            }
            _ => fields.push(outer.to_string()),
        }
    }
    fields.sort();

    let field = fields.into_iter().next().unwrap_or_else(|| "config".to_string());
    AlignmentError::config_validation(field, format!("value out of range: {errors}"))
}

/// NaN passes `range` and would disable the budget gate
fn validate_finite(blueprint: &SessionBlueprint) -> Result<(), AlignmentError> {
    let timebase = &blueprint.timebase;
    let fields = [
        ("timebase.jitter_budget_s", timebase.jitter_budget_s),
        ("timebase.offset_s", timebase.offset_s),
        ("timebase.nominal_rate_hz", timebase.nominal_rate_hz),
        ("timebase.external_clock_rate_hz", timebase.external_clock_rate_hz),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(AlignmentError::config_validation(
                field,
                format!("must be a finite number, got {value}"),
            ));
        }
    }
    Ok(())
}

fn validate_session(blueprint: &SessionBlueprint) -> Result<(), AlignmentError> {
    if blueprint.session.id.trim().is_empty() {
        return Err(AlignmentError::config_validation(
            "session.id",
            "session id cannot be empty",
        ));
    }
    Ok(())
}

/// `ttl_id` is required and must resolve to discovered files iff source = ttl
fn validate_ttl(blueprint: &SessionBlueprint) -> Result<(), AlignmentError> {
    let timebase = &blueprint.timebase;
    match (timebase.source, timebase.ttl_id.as_deref()) {
        (TimebaseSource::Ttl, None) => Err(AlignmentError::config_validation(
            "timebase.ttl_id",
            "ttl_id is required when source = ttl",
        )),
        (TimebaseSource::Ttl, Some(ttl_id)) => {
            if blueprint.pulse_log_files(ttl_id).is_empty() {
                return Err(AlignmentError::config_validation(
                    "timebase.ttl_id",
                    format!("ttl_id '{ttl_id}' does not resolve to any pulse_logs files"),
                ));
            }
            Ok(())
        }
        (source, Some(_)) => Err(AlignmentError::config_validation(
            "timebase.ttl_id",
            format!("ttl_id is only valid when source = ttl (source = {source})"),
        )),
        (_, None) => Ok(()),
    }
}

/// `external_clock_stream` is required iff source = external_clock
fn validate_external_clock(blueprint: &SessionBlueprint) -> Result<(), AlignmentError> {
    let timebase = &blueprint.timebase;
    match (
        timebase.source,
        timebase.external_clock_stream.as_deref(),
    ) {
        (TimebaseSource::ExternalClock, None) => Err(AlignmentError::config_validation(
            "timebase.external_clock_stream",
            "external_clock_stream is required when source = external_clock",
        )),
        (TimebaseSource::ExternalClock, Some(stream)) if stream.trim().is_empty() => {
            Err(AlignmentError::config_validation(
                "timebase.external_clock_stream",
                "external_clock_stream cannot be empty",
            ))
        }
        (TimebaseSource::ExternalClock, Some(_)) => Ok(()),
        (source, Some(_)) => Err(AlignmentError::config_validation(
            "timebase.external_clock_stream",
            format!(
                "external_clock_stream is only valid when source = external_clock (source = {source})"
            ),
        )),
        (_, None) => Ok(()),
    }
}

/// Modality names are unique, non-empty, and name a sample file
///
/// Sidecar file names must be unique too: `cam0/pose` and `cam0_pose` would
/// write the same file.
fn validate_modalities(blueprint: &SessionBlueprint) -> Result<(), AlignmentError> {
    let mut seen = HashSet::new();
    let mut files = HashSet::new();
    for (idx, modality) in blueprint.modalities.iter().enumerate() {
        if modality.name.trim().is_empty() {
            return Err(AlignmentError::config_validation(
                format!("modalities[{idx}].name"),
                "modality name cannot be empty",
            ));
        }
        if !seen.insert(&modality.name) {
            return Err(AlignmentError::config_validation(
                format!("modalities[name={}]", modality.name),
                "duplicate modality name",
            ));
        }
        let file_name = sidecar_file_name(&modality.name);
        if !files.insert(file_name.clone()) {
            return Err(AlignmentError::config_validation(
                format!("modalities[name={}]", modality.name),
                format!("sidecar file name '{file_name}' collides with another modality"),
            ));
        }
        if modality.samples.as_os_str().is_empty() {
            return Err(AlignmentError::config_validation(
                format!("modalities[{}].samples", modality.name),
                "samples path cannot be empty",
            ));
        }
    }
    Ok(())
}
