//! FileStatsSink - writes one JSON sidecar per modality

pub use contracts::sidecar_file_name;
use contracts::{AlignmentError, AlignmentStats, StatsSink};
use std::path::{Path, PathBuf};
use tracing::{debug, error, instrument};

use crate::SidecarError;

/// Sink that writes `<dir>/<modality>_alignment_stats.json`
pub struct FileStatsSink {
    name: String,
    base_path: PathBuf,
    written: Vec<PathBuf>,
}

impl FileStatsSink {
    /// Create a new FileStatsSink, creating the output directory if needed
    pub fn new(name: impl Into<String>, base_path: impl Into<PathBuf>) -> Result<Self, SidecarError> {
        let name = name.into();
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).map_err(|e| {
            SidecarError::sink_creation(&name, format!("{}: {e}", base_path.display()))
        })?;

        Ok(Self {
            name,
            base_path,
            written: Vec::new(),
        })
    }

    /// Output directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Paths written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    async fn persist(&mut self, modality: &str, stats: &AlignmentStats) -> std::io::Result<PathBuf> {
        let path = self.base_path.join(sidecar_file_name(modality));
        let body = serde_json::to_vec_pretty(stats)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}

impl StatsSink for FileStatsSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_stats_sink_write",
        skip(self, stats),
        fields(sink = %self.name)
    )]
    async fn write(&mut self, modality: &str, stats: &AlignmentStats) -> Result<(), AlignmentError> {
        match self.persist(modality, stats).await {
            Ok(path) => {
                debug!(sink = %self.name, path = %path.display(), "sidecar written");
                self.written.push(path);
                Ok(())
            }
            Err(e) => {
                error!(sink = %self.name, modality, error = %e, "Write failed");
                Err(AlignmentError::sink_write(&self.name, e.to_string()))
            }
        }
    }

    #[instrument(name = "file_stats_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), AlignmentError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MappingStrategy, TimebaseSource};
    use tempfile::tempdir;

    fn stats() -> AlignmentStats {
        AlignmentStats {
            timebase_source: TimebaseSource::Ttl,
            mapping: MappingStrategy::Nearest,
            offset_s: 0.0,
            max_jitter_s: 0.004,
            p95_jitter_s: 0.003,
            aligned_samples: 1200,
        }
    }

    #[tokio::test]
    async fn test_file_sink_write() {
        let dir = tempdir().unwrap();
        let mut sink = FileStatsSink::new("test_file", dir.path().join("alignment")).unwrap();

        sink.write("pose", &stats()).await.unwrap();
        sink.flush().await.unwrap();

        let path = dir.path().join("alignment/pose_alignment_stats.json");
        assert!(path.exists());
        assert_eq!(sink.written(), &[path.clone()]);

        let parsed: AlignmentStats =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, stats());
    }

    #[tokio::test]
    async fn test_sidecar_json_fields() {
        let dir = tempdir().unwrap();
        let mut sink = FileStatsSink::new("test_file", dir.path()).unwrap();
        sink.write("facemap", &stats()).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("facemap_alignment_stats.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timebase_source"], "ttl");
        assert_eq!(value["mapping"], "nearest");
        assert_eq!(value["aligned_samples"], 1200);
    }
}
