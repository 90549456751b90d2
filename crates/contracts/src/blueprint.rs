//! SessionBlueprint - Config Loader output
//!
//! Describes one recording session: timebase selection, discovered pulse logs,
//! modalities to align and where sidecars go.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use validator::Validate;

use crate::TimebaseConfiguration;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete session configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Session identity
    pub session: SessionInfo,

    /// Timebase selection
    #[validate(nested)]
    pub timebase: TimebaseConfiguration,

    /// Discovered pulse-log files per clock identifier
    #[serde(default)]
    pub pulse_logs: HashMap<String, Vec<PathBuf>>,

    /// Modalities to align
    #[serde(default)]
    pub modalities: Vec<ModalityConfig>,

    /// Sidecar output routing
    #[serde(default)]
    pub output: OutputConfig,
}

/// Session identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session identifier (e.g. "SNA-145518_2025-01-14")
    pub id: String,

    /// Expected tick count for synthetic providers (e.g. camera frames)
    #[serde(default)]
    pub frame_count: Option<usize>,
}

/// One modality's sample source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalityConfig {
    /// Modality name, also used for the sidecar file name
    pub name: String,

    /// Path to the sample-time file (one timestamp per non-empty line)
    pub samples: PathBuf,
}

/// Sidecar output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `<modality>_alignment_stats.json`
    #[serde(default = "default_sidecar_dir")]
    pub sidecar_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sidecar_dir: default_sidecar_dir(),
        }
    }
}

fn default_sidecar_dir() -> PathBuf {
    PathBuf::from("alignment")
}

impl SessionBlueprint {
    /// Pulse-log files registered for `clock_id`
    pub fn pulse_log_files(&self, clock_id: &str) -> &[PathBuf] {
        self.pulse_logs
            .get(clock_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
