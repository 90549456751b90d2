//! Session alignment pipeline.

mod orchestrator;
mod stats;

pub use orchestrator::{build_reference_timeline, Session, SessionConfig};
pub use stats::SessionStats;
