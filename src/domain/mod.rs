//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the user-controlled structural coefficients (`StructuralParams`)
//! - simulated observations and cohort summaries (`Observation`, `Dataset`)
//! - the three regression specifications (`ModelSpec`) and their fits
//! - derived headline outputs and display toggles

pub mod types;

pub use types::*;
