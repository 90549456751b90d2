//! Session statistics.

use std::path::PathBuf;
use std::time::Duration;

use contracts::TimebaseSource;
use observability::JitterAggregator;

/// Statistics from one session run
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub session_id: String,

    pub timebase_source: TimebaseSource,

    /// Reference timeline length (ticks)
    pub reference_len: usize,

    /// Wall time of the run
    pub duration: Duration,

    /// Sidecar files written (empty on dry run)
    pub sidecars: Vec<PathBuf>,

    /// Per-modality jitter aggregation
    pub jitter: JitterAggregator,
}

impl SessionStats {
    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Session {} ===\n", self.session_id);
        println!("Timebase");
        println!("   ├─ Source: {}", self.timebase_source);
        println!("   ├─ Reference ticks: {}", self.reference_len);
        println!("   └─ Duration: {:.3}s", self.duration.as_secs_f64());

        let modalities = &self.jitter.modalities;
        println!("\nModalities ({})", modalities.len());
        for (i, (name, summary)) in modalities.iter().enumerate() {
            let prefix = if i + 1 == modalities.len() { "└─" } else { "├─" };
            println!(
                "   {} {} ({}, n={}): max={:.6}s p95={:.6}s",
                prefix,
                name,
                summary.mapping,
                summary.aligned_samples,
                summary.max_jitter_s,
                summary.p95_jitter_s
            );
        }

        println!("\n{}", self.jitter.summary());

        if !self.sidecars.is_empty() {
            println!("Sidecars");
            for path in &self.sidecars {
                println!("   - {}", path.display());
            }
        }

        println!();
    }
}
