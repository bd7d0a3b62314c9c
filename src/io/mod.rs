//! Input/output helpers.
//!
//! - cohort CSV export (`export`)
//! - snapshot JSON read/write (`snapshot`)

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;
