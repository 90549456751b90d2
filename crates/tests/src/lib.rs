//! # Integration Tests
//!
//! Cross-crate end-to-end tests.
//!
//! Covers:
//! - sidecar contract snapshot
//! - config file -> provider -> align -> sidecar
//! - concurrent modalities over one shared timeline

#[cfg(test)]
mod contract_tests {
    use contracts::{AlignmentStats, MappingStrategy, TimebaseSource};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_sidecar_schema_keys() {
        let stats = AlignmentStats {
            timebase_source: TimebaseSource::ExternalClock,
            mapping: MappingStrategy::Linear,
            offset_s: 0.0,
            max_jitter_s: 0.0,
            p95_jitter_s: 0.0,
            aligned_samples: 0,
        };
        let value = serde_json::to_value(&stats).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "aligned_samples",
                "mapping",
                "max_jitter_s",
                "offset_s",
                "p95_jitter_s",
                "timebase_source"
            ]
        );
        assert_eq!(value["timebase_source"], "neuropixels");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;
    use std::sync::Arc;

    use config_loader::ConfigLoader;
    use contracts::{AlignmentStats, ReferenceTimeline, SessionBlueprint, TimebaseSource};
    use observability::JitterAggregator;
    use sidecar::{FileStatsSink, MemoryStatsSink};
    use timebase::{
        align_samples, create_alignment_stats, create_timebase_provider, write_alignment_stats,
    };
    use tempfile::tempdir;
    use tokio::task::JoinSet;

    /// 120 pulses at 30 Hz, split 50/70 across two files
    fn write_pulse_logs(dir: &Path) {
        let pulses: Vec<f64> = (0..120).map(|i| i as f64 / 30.0).collect();
        let (a, b) = pulses.split_at(50);

        let mut a_text: Vec<String> = a.iter().map(|t| format!("{t:.9}")).collect();
        a_text.reverse();
        let b_text: Vec<String> = b.iter().map(|t| format!("  {t:.9}  ")).collect();

        std::fs::create_dir_all(dir.join("ttl")).unwrap();
        std::fs::write(dir.join("ttl/cam0_a.txt"), a_text.join("\n")).unwrap();
        std::fs::write(dir.join("ttl/cam0_b.txt"), b_text.join("\n\n")).unwrap();
    }

    fn write_session(dir: &Path, source_block: &str) -> SessionBlueprint {
        std::fs::write(dir.join("pose.txt"), "0.01\n1.0\n2.51\n").unwrap();
        std::fs::write(dir.join("events.txt"), "0.5\n3.0\n").unwrap();

        let toml = format!(
            r#"
[session]
id = "e2e-session"
frame_count = 120

{source_block}

[pulse_logs]
cam0_ttl = ["ttl/cam0_a.txt", "ttl/cam0_b.txt"]

[[modalities]]
name = "pose"
samples = "pose.txt"

[[modalities]]
name = "events"
samples = "events.txt"

[output]
sidecar_dir = "alignment"
"#
        );
        let path = dir.join("session.toml");
        std::fs::write(&path, toml).unwrap();
        ConfigLoader::load_from_path(&path).unwrap()
    }

    fn load_samples(path: &Path) -> Vec<f64> {
        timebase::parse_timestamps(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn build_timeline(bp: &SessionBlueprint) -> ReferenceTimeline {
        create_timebase_provider(&bp.timebase, &bp.pulse_logs)
            .unwrap()
            .get_timestamps(bp.session.frame_count)
            .unwrap()
    }

    /// Config file -> TTL provider -> align -> JSON sidecars
    #[tokio::test]
    async fn test_e2e_ttl_session_to_sidecars() {
        let dir = tempdir().unwrap();
        write_pulse_logs(dir.path());
        let bp = write_session(
            dir.path(),
            r#"[timebase]
source = "ttl"
mapping = "nearest"
jitter_budget_s = 0.02
ttl_id = "cam0_ttl""#,
        );

        let timeline = build_timeline(&bp);
        assert_eq!(timeline.len(), 120);
        assert!(timeline.windows(2).all(|w| w[0] < w[1]));

        let mut sink = FileStatsSink::new("sidecar", &bp.output.sidecar_dir).unwrap();
        for modality in &bp.modalities {
            let samples = load_samples(&modality.samples);
            let outcome = align_samples(&samples, &timeline, &bp.timebase, true).unwrap();
            let stats = create_alignment_stats(&bp.timebase, &outcome);
            write_alignment_stats(&mut sink, &modality.name, &stats)
                .await
                .unwrap();
        }

        let raw =
            std::fs::read_to_string(dir.path().join("alignment/pose_alignment_stats.json"))
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timebase_source"], "ttl");
        assert_eq!(value["mapping"], "nearest");
        assert_eq!(value["aligned_samples"], 3);
        assert!(value["max_jitter_s"].as_f64().unwrap() <= 0.02);
        assert!(dir
            .path()
            .join("alignment/events_alignment_stats.json")
            .exists());
    }

    /// Any modality over budget means no sidecar for the session
    #[tokio::test]
    async fn test_e2e_budget_failure_blocks_sidecars() {
        let dir = tempdir().unwrap();
        write_pulse_logs(dir.path());
        let bp = write_session(
            dir.path(),
            r#"[timebase]
source = "ttl"
mapping = "nearest"
jitter_budget_s = 0.005
ttl_id = "cam0_ttl""#,
        );
        let timeline = build_timeline(&bp);

        let mut passed: Vec<(String, AlignmentStats)> = Vec::new();
        let mut failure = None;
        for modality in &bp.modalities {
            let samples = load_samples(&modality.samples);
            match align_samples(&samples, &timeline, &bp.timebase, true) {
                Ok(outcome) => passed.push((
                    modality.name.clone(),
                    create_alignment_stats(&bp.timebase, &outcome),
                )),
                Err(e) => {
                    failure = Some((modality.name.clone(), e));
                    break;
                }
            }
        }

        let (name, err) = failure.expect("pose exceeds 5 ms budget");
        assert_eq!(name, "pose");
        assert!(err.is_budget_exceeded(), "got: {err}");

        // The same session passes once the gate is disabled
        let samples = load_samples(&bp.modalities[0].samples);
        let outcome = align_samples(&samples, &timeline, &bp.timebase, false).unwrap();
        assert!(outcome.jitter.max_jitter_s > bp.timebase.jitter_budget_s);
        assert!(!dir.path().join("alignment").exists());
    }

    /// Concurrent alignment over one Arc'd timeline matches sequential results
    #[tokio::test]
    async fn test_e2e_parallel_modalities_share_timeline() {
        let dir = tempdir().unwrap();
        let bp = write_session(
            dir.path(),
            r#"[timebase]
source = "nominal_rate"
mapping = "linear"
jitter_budget_s = 0.0"#,
        );
        let timeline = Arc::new(build_timeline(&bp));

        let mut tasks = JoinSet::new();
        for modality in bp.modalities.clone() {
            let timeline = Arc::clone(&timeline);
            let config = bp.timebase.clone();
            let samples = load_samples(&modality.samples);
            tasks.spawn_blocking(move || {
                let outcome = align_samples(&samples, &timeline, &config, true).unwrap();
                (modality.name, create_alignment_stats(&config, &outcome))
            });
        }

        let mut sink = MemoryStatsSink::new("memory");
        let mut aggregator = JitterAggregator::new();
        while let Some(joined) = tasks.join_next().await {
            let (name, stats) = joined.unwrap();
            aggregator.update(&name, &stats);
            write_alignment_stats(&mut sink, &name, &stats)
                .await
                .unwrap();
        }

        assert_eq!(sink.records().len(), 2);
        assert_eq!(sink.flush_count(), 2);
        for modality in &bp.modalities {
            let samples = load_samples(&modality.samples);
            let sequential = align_samples(&samples, &timeline, &bp.timebase, true).unwrap();
            let expected = create_alignment_stats(&bp.timebase, &sequential);
            assert_eq!(sink.get(&modality.name), Some(&expected));
        }
        // All samples fall inside [0, 119/30]; linear mapping is exact there.
        assert_eq!(aggregator.summary().max_jitter_s.max, 0.0);
        assert_eq!(aggregator.total_samples, 5);
    }

    /// The external clock stub is selected through its alias and tagged in sidecars
    #[tokio::test]
    async fn test_e2e_external_clock_stub() {
        let dir = tempdir().unwrap();
        let bp = write_session(
            dir.path(),
            r#"[timebase]
source = "external_clock"
mapping = "nearest"
jitter_budget_s = 0.001
external_clock_stream = "imec0""#,
        );
        assert_eq!(bp.timebase.source, TimebaseSource::ExternalClock);

        let timeline = build_timeline(&bp);
        assert_eq!(timeline.len(), 120);

        let samples = [0.0, 0.001, 0.00205];
        let outcome = align_samples(&samples, &timeline, &bp.timebase, true).unwrap();
        let stats = create_alignment_stats(&bp.timebase, &outcome);

        let mut sink = FileStatsSink::new("sidecar", &bp.output.sidecar_dir).unwrap();
        write_alignment_stats(&mut sink, "ephys_events", &stats)
            .await
            .unwrap();

        let raw = std::fs::read_to_string(
            dir.path().join("alignment/ephys_events_alignment_stats.json"),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timebase_source"], "neuropixels");
    }

    /// Offset is applied once, at timeline construction
    #[test]
    fn test_e2e_offset_shifts_reference_not_samples() {
        let dir = tempdir().unwrap();
        write_pulse_logs(dir.path());
        let bp = write_session(
            dir.path(),
            r#"[timebase]
source = "ttl"
mapping = "nearest"
jitter_budget_s = 0.02
offset_s = 0.5
ttl_id = "cam0_ttl""#,
        );
        let timeline = build_timeline(&bp);
        assert!((timeline.start() - 0.5).abs() < 1e-9);

        let outcome = align_samples(&[0.5], &timeline, &bp.timebase, true).unwrap();
        assert_eq!(outcome.result.indices(), Some(&[0usize][..]));
        assert_eq!(
            create_alignment_stats(&bp.timebase, &outcome).offset_s,
            0.5
        );
    }

    /// The bundled demo session loads and passes its own budget
    #[test]
    fn test_demo_session_aligns_within_budget() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/session.toml");
        let bp = ConfigLoader::load_from_path(&path).unwrap();
        let timeline = build_timeline(&bp);
        assert_eq!(timeline.len(), 300);

        for modality in &bp.modalities {
            let samples = load_samples(&modality.samples);
            let outcome = align_samples(&samples, &timeline, &bp.timebase, true);
            assert!(outcome.is_ok(), "{}: {:?}", modality.name, outcome.err());
        }
    }
}
