//! Sink implementations
//!
//! Contains FileStatsSink, LogStatsSink, and MemoryStatsSink.

mod file;
mod log;
mod memory;

pub use self::file::{sidecar_file_name, FileStatsSink};
pub use self::log::LogStatsSink;
pub use self::memory::MemoryStatsSink;
