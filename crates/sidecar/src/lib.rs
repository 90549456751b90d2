//! # Sidecar
//!
//! Alignment-stats persistence.
//!
//! Responsibilities:
//! - Write one `AlignmentStats` JSON document per modality
//! - Provide log and in-memory writers for dry runs and tests
//! - Keep I/O out of the pure alignment path

pub mod error;
pub mod sinks;

pub use contracts::{AlignmentStats, StatsSink};
pub use error::SidecarError;
pub use sinks::{sidecar_file_name, FileStatsSink, LogStatsSink, MemoryStatsSink};
