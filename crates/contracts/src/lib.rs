//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - All times are seconds as `f64`
//! - The reference timeline is the session's single authoritative clock;
//!   derived samples are indexed against it, never re-timed

mod alignment;
mod blueprint;
mod error;
mod sink;
mod timebase_config;
mod timeline;

pub use alignment::*;
pub use blueprint::*;
pub use error::*;
pub use sink::*;
pub use timebase_config::*;
pub use timeline::*;
