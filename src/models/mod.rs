//! Regression-specification evaluation.
//!
//! Models are implemented as small, pure functions so that fitting and
//! plotting code can stay generic over the three specifications.

pub mod model;

pub use model::*;
