//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the generate/fit/select pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ExportArgs, SimArgs};
use crate::domain::{DisplayState, SimConfig, StructuralParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `collider` binary.
pub fn run() -> Result<(), AppError> {
    let _ = env_logger::try_init();

    // We want `collider` and `collider --alpha1 2.5` to behave like
    // `collider tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_fit(args: SimArgs) -> Result<(), AppError> {
    let config = sim_config_from_args(&args);
    let controller =
        pipeline::Controller::new(config.seed, config.params, config.sample_count)?;
    let snapshot = controller.snapshot();

    println!(
        "{}",
        crate::report::format_run_summary(snapshot, &config.display)
    );
    println!(
        "{}",
        crate::report::format_preview(&snapshot.dataset, config.preview_rows)
    );

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            snapshot,
            &config.display,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::write_dataset_csv(path, &snapshot.dataset)?;
        log::info!("wrote cohort CSV: {}", path.display());
    }
    if let Some(path) = &config.export_snapshot {
        crate::io::write_snapshot_json(path, snapshot)?;
        log::info!("wrote snapshot JSON: {}", path.display());
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let data = crate::data::generate(
        args.seed,
        StructuralParams::new(args.alpha1, args.alpha2),
        args.sample_count,
    )?;
    crate::io::write_dataset_csv(&args.out, &data)?;
    println!("Wrote {} rows to {}", data.rows.len(), args.out.display());
    Ok(())
}

pub fn sim_config_from_args(args: &SimArgs) -> SimConfig {
    SimConfig {
        seed: args.seed,
        sample_count: args.sample_count,
        params: StructuralParams::new(args.alpha1, args.alpha2),
        display: DisplayState {
            show_unadjusted: !args.hide_unadjusted,
            show_age_adjusted: !args.hide_age_adjusted,
            show_collider_adjusted: !args.hide_collider_adjusted,
        },
        preview_rows: args.preview,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_snapshot: args.export_snapshot.clone(),
    }
}

/// Rewrite argv so `collider` defaults to `collider tui`.
///
/// Rules:
/// - `collider`                      -> `collider tui`
/// - `collider --alpha1 2.5 ...`     -> `collider tui --alpha1 2.5 ...`
/// - `collider --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["collider"])), argv(&["collider", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["collider", "--alpha1", "2.5"])),
            argv(&["collider", "tui", "--alpha1", "2.5"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["collider", "fit"])),
            argv(&["collider", "fit"])
        );
        assert_eq!(
            rewrite_args(argv(&["collider", "--help"])),
            argv(&["collider", "--help"])
        );
    }

    #[test]
    fn hide_flags_invert_into_display_state() {
        let cli = crate::cli::Cli::parse_from([
            "collider",
            "fit",
            "--hide-collider-adjusted",
            "--no-plot",
        ]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit subcommand");
        };
        let config = sim_config_from_args(&args);
        assert!(config.display.show_unadjusted);
        assert!(!config.display.show_collider_adjusted);
        assert!(!config.plot);
        assert_eq!(config.seed, 777);
        assert_eq!(config.sample_count, 1000);
    }
}
