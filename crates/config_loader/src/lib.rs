//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON session configuration files
//! - Enforce the conditional timebase fields before any alignment runs
//! - Generate `SessionBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("session.toml")).unwrap();
//! println!("Source: {}", blueprint.timebase.source);
//! ```

mod parser;
mod validator;

pub use contracts::SessionBlueprint;
pub use parser::ConfigFormat;

use contracts::AlignmentError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    /// Relative pulse-log, sample and output paths are resolved against the
    /// directory containing the configuration file.
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<SessionBlueprint, AlignmentError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        let mut blueprint = Self::load_from_str(&content, format)?;

        if let Some(base) = path.parent() {
            Self::resolve_paths(&mut blueprint, base);
        }
        debug!(path = %path.display(), session = %blueprint.session.id, "configuration loaded");
        Ok(blueprint)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SessionBlueprint, AlignmentError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize SessionBlueprint to TOML string
    pub fn to_toml(blueprint: &SessionBlueprint) -> Result<String, AlignmentError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| AlignmentError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize SessionBlueprint to JSON string
    pub fn to_json(blueprint: &SessionBlueprint) -> Result<String, AlignmentError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| AlignmentError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, AlignmentError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            AlignmentError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            AlignmentError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, AlignmentError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SessionBlueprint, AlignmentError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    fn resolve_paths(blueprint: &mut SessionBlueprint, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        for files in blueprint.pulse_logs.values_mut() {
            files.iter_mut().for_each(resolve);
        }
        for modality in &mut blueprint.modalities {
            resolve(&mut modality.samples);
        }
        resolve(&mut blueprint.output.sidecar_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MappingStrategy, TimebaseSource};
    use tempfile::tempdir;

    const MINIMAL_TOML: &str = r#"
[session]
id = "session-001"
frame_count = 9000

[timebase]
source = "ttl"
mapping = "nearest"
jitter_budget_s = 0.01
offset_s = 0.0
ttl_id = "cam0_ttl"

[pulse_logs]
cam0_ttl = ["ttl/cam0_a.txt", "ttl/cam0_b.txt"]

[[modalities]]
name = "pose"
samples = "pose_times.txt"

[output]
sidecar_dir = "out"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.session.id, "session-001");
        assert_eq!(bp.timebase.source, TimebaseSource::Ttl);
        assert_eq!(bp.timebase.mapping, MappingStrategy::Nearest);
        assert_eq!(bp.pulse_log_files("cam0_ttl").len(), 2);
    }

    #[test]
    fn test_round_trip_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.session.id, bp2.session.id);
        assert_eq!(bp.timebase, bp2.timebase);
        assert_eq!(bp.modalities.len(), bp2.modalities.len());
    }

    #[test]
    fn test_round_trip_json() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp.timebase, bp2.timebase);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = MINIMAL_TOML.replace("ttl_id = \"cam0_ttl\"", "");
        let result = ConfigLoader::load_from_str(&content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ttl_id"));
    }

    #[test]
    fn test_nan_budget_in_toml_rejected() {
        let content = MINIMAL_TOML.replace("jitter_budget_s = 0.01", "jitter_budget_s = nan");
        let err = ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("jitter_budget_s"), "got: {err}");
    }

    #[test]
    fn test_load_from_path_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, MINIMAL_TOML).unwrap();

        let bp = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(
            bp.pulse_log_files("cam0_ttl")[0],
            dir.path().join("ttl/cam0_a.txt")
        );
        assert_eq!(bp.modalities[0].samples, dir.path().join("pose_times.txt"));
        assert_eq!(bp.output.sidecar_dir, dir.path().join("out"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigLoader::load_from_path(Path::new("session.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }
}
