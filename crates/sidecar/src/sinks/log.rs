//! LogStatsSink - logs alignment summaries via tracing

use contracts::{AlignmentError, AlignmentStats, StatsSink};
use tracing::{info, instrument};

/// Sink that logs alignment summaries (dry runs, debugging)
pub struct LogStatsSink {
    name: String,
}

impl LogStatsSink {
    /// Create a new LogStatsSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl StatsSink for LogStatsSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_stats_sink_write", skip(self, stats), fields(sink = %self.name))]
    async fn write(&mut self, modality: &str, stats: &AlignmentStats) -> Result<(), AlignmentError> {
        info!(
            sink = %self.name,
            modality,
            timebase_source = %stats.timebase_source,
            mapping = %stats.mapping,
            offset_s = stats.offset_s,
            max_jitter_s = stats.max_jitter_s,
            p95_jitter_s = stats.p95_jitter_s,
            aligned_samples = stats.aligned_samples,
            "AlignmentStats"
        );
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), AlignmentError> {
        // Nothing to flush for log sink
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MappingStrategy, TimebaseSource};

    #[tokio::test]
    async fn test_log_sink_write() {
        let mut sink = LogStatsSink::new("test_log");
        let stats = AlignmentStats {
            timebase_source: TimebaseSource::NominalRate,
            mapping: MappingStrategy::Linear,
            offset_s: 0.0,
            max_jitter_s: 0.0,
            p95_jitter_s: 0.0,
            aligned_samples: 0,
        };

        assert!(sink.write("events", &stats).await.is_ok());
        assert!(sink.flush().await.is_ok());
    }
}
