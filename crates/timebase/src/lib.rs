//! # Timebase
//!
//! Timebase provider and sample alignment engine.
//!
//! Responsibilities:
//! - Build the session reference timeline from one clock source
//! - Map per-modality sample times onto it (nearest / linear)
//! - Quantify residual jitter (max, p95)
//! - Gate downstream assembly on the jitter budget
//!
//! All alignment functions are pure over immutable inputs, so one call per
//! modality may run in parallel against the same timeline.
//!
//! ## Example
//!
//! ```
//! use timebase::{align_samples, create_alignment_stats, NominalRateProvider};
//! use timebase::{MappingStrategy, TimebaseConfiguration};
//!
//! let config = TimebaseConfiguration {
//!     mapping: MappingStrategy::Nearest,
//!     jitter_budget_s: 0.05,
//!     ..Default::default()
//! };
//!
//! let reference = NominalRateProvider::new(30.0, 0.0)
//!     .get_timestamps(Some(300))
//!     .unwrap();
//! let outcome = align_samples(&[0.51, 1.02], &reference, &config, true).unwrap();
//! let stats = create_alignment_stats(&config, &outcome);
//! assert_eq!(stats.aligned_samples, 2);
//! ```

mod align;
mod budget;
mod jitter;
mod mapping;
mod provider;
pub mod search;

pub use align::{align_samples, create_alignment_stats, write_alignment_stats, AlignmentOutcome};
pub use budget::enforce_jitter_budget;
pub use jitter::{compute_jitter, jitter_from_residuals, percentile_sorted, JITTER_PERCENTILE};
pub use mapping::{map_linear, map_nearest, map_samples};
pub use provider::{
    create_timebase_provider, parse_timestamps, ExternalClockProvider, NominalRateProvider,
    PulseLogProvider, TimebaseProvider, TimestampParseError,
};

// Re-export contracts types
pub use contracts::{
    AlignmentError, AlignmentResult, AlignmentStats, JitterStatistics, MappingStrategy,
    ReferenceTimeline, TimebaseConfiguration, TimebaseSource,
};
