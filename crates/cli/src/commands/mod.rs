//! Command implementations.

mod align;
mod info;
mod validate;

pub use align::run_align;
pub use info::run_info;
pub use validate::run_validate;
