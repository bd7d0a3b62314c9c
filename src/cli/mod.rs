//! Command-line parsing for the collider-bias demonstrator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "collider",
    version,
    about = "Collider-bias regression demonstrator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the cohort, fit the three models, and print formulas,
    /// coefficients, a preview table, and optionally an ASCII plot.
    Fit(SimArgs),
    /// Generate the cohort and write it as CSV.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `collider fit`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(SimArgs),
}

/// Common options for fitting and the TUI.
#[derive(Debug, Parser, Clone)]
pub struct SimArgs {
    /// Direct sodium -> proteinuria coefficient (alpha1), in [0.5, 5.0].
    #[arg(long, default_value_t = 0.5)]
    pub alpha1: f64,

    /// SBP -> proteinuria coefficient (alpha2), in [0.5, 5.0].
    #[arg(long, default_value_t = 0.05)]
    pub alpha2: f64,

    /// Random seed for cohort generation.
    #[arg(long, default_value_t = 777)]
    pub seed: u64,

    /// Number of simulated subjects.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub sample_count: usize,

    /// Hide Model 1 (unadjusted).
    #[arg(long)]
    pub hide_unadjusted: bool,

    /// Hide Model 2 (age-adjusted).
    #[arg(long)]
    pub hide_age_adjusted: bool,

    /// Hide Model 3 (collider-adjusted).
    #[arg(long)]
    pub hide_collider_adjusted: bool,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Number of preview rows printed with the summary.
    #[arg(long, default_value_t = 6)]
    pub preview: usize,

    /// Export the cohort to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the fitted snapshot (models + derived outputs) to JSON.
    #[arg(long = "export-snapshot")]
    pub export_snapshot: Option<PathBuf>,
}

/// Options for the one-shot CSV export.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Output CSV path.
    #[arg(value_name = "CSV")]
    pub out: PathBuf,

    /// Direct sodium -> proteinuria coefficient (alpha1), in [0.5, 5.0].
    #[arg(long, default_value_t = 0.5)]
    pub alpha1: f64,

    /// SBP -> proteinuria coefficient (alpha2), in [0.5, 5.0].
    #[arg(long, default_value_t = 0.05)]
    pub alpha2: f64,

    /// Random seed for cohort generation.
    #[arg(long, default_value_t = 777)]
    pub seed: u64,

    /// Number of simulated subjects.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub sample_count: usize,
}
