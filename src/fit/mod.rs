//! Regression fitting.
//!
//! Responsibilities:
//!
//! - build the design matrix for each fixed specification
//! - solve the three OLS problems (parallel)
//! - derive the headline sodium coefficient and its sign

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
