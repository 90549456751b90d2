//! MemoryStatsSink - keeps sidecar records in memory

use std::collections::BTreeMap;

use contracts::{AlignmentError, AlignmentStats, StatsSink};

/// Sink that stores records keyed by modality
#[derive(Debug, Default)]
pub struct MemoryStatsSink {
    name: String,
    records: BTreeMap<String, AlignmentStats>,
    flushes: usize,
}

impl MemoryStatsSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Record written for `modality`, if any
    pub fn get(&self, modality: &str) -> Option<&AlignmentStats> {
        self.records.get(modality)
    }

    /// All records, ordered by modality name
    pub fn records(&self) -> &BTreeMap<String, AlignmentStats> {
        &self.records
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl StatsSink for MemoryStatsSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, modality: &str, stats: &AlignmentStats) -> Result<(), AlignmentError> {
        self.records.insert(modality.to_string(), stats.clone());
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), AlignmentError> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MappingStrategy, TimebaseSource};

    #[tokio::test]
    async fn test_memory_sink_overwrites_per_modality() {
        let mut sink = MemoryStatsSink::new("mem");
        let mut stats = AlignmentStats {
            timebase_source: TimebaseSource::Ttl,
            mapping: MappingStrategy::Nearest,
            offset_s: 0.0,
            max_jitter_s: 0.1,
            p95_jitter_s: 0.05,
            aligned_samples: 10,
        };
        sink.write("pose", &stats).await.unwrap();
        stats.aligned_samples = 11;
        sink.write("pose", &stats).await.unwrap();
        sink.flush().await.unwrap();

        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.get("pose").map(|s| s.aligned_samples), Some(11));
        assert_eq!(sink.flush_count(), 1);
    }
}
