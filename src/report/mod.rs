//! Reporting utilities: run summaries, preview tables, and number formatting.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::Snapshot;
use crate::domain::{Dataset, DisplayState, ModelSpec, Sign};

/// Headline coefficients are always rendered to three decimal places.
pub fn fmt_coefficient(value: f64) -> String {
    format!("{value:.3}")
}

/// Format the full run summary (inputs + per-model formulas and coefficients).
pub fn format_run_summary(snapshot: &Snapshot, display: &DisplayState) -> String {
    let data = &snapshot.dataset;
    let mut out = String::new();

    out.push_str("=== collider - collider bias demonstrator ===\n");
    out.push_str(&format!(
        "alpha1: {:.2} | alpha2: {:.2} | seed: {} | n: {}\n",
        data.params.alpha1, data.params.alpha2, data.seed, data.stats.n_rows
    ));
    out.push_str(&format!(
        "sodium=[{:.2}, {:.2}] | sbp=[{:.2}, {:.2}] | mean age={:.1} | mean proteinuria={:.2}\n",
        data.stats.sodium_min,
        data.stats.sodium_max,
        data.stats.sbp_min,
        data.stats.sbp_max,
        data.stats.age_mean,
        data.stats.proteinuria_mean
    ));

    out.push_str("\nFitted models:\n");
    for (fit, derived) in snapshot.fits.iter().zip(snapshot.derived.iter()) {
        if !display.is_shown(fit.spec) {
            out.push_str(&format!("  (hidden) {}\n", fit.spec.display_name()));
            continue;
        }

        let sign_marker = match (fit.spec, derived.sign) {
            (ModelSpec::ColliderAdjusted, Sign::Positive) => "  [sign: positive]",
            (ModelSpec::ColliderAdjusted, Sign::NonPositive) => "  [sign: non-positive]",
            _ => "",
        };
        out.push_str(&format!(
            "  {:<28} {:<34} sodium={:>8} RMSE={:.3}{sign_marker}\n",
            fit.spec.display_name(),
            fit.spec.formula(),
            fmt_coefficient(derived.sodium_coefficient),
            fit.rmse
        ));
    }

    out
}

/// Format the first `rows` observations as an aligned read-only table.
pub fn format_preview(dataset: &Dataset, rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>12} {:>12} {:>12} {:>12}\n",
        "sbp", "sodium", "age", "proteinuria"
    ));
    for row in dataset.rows.iter().take(rows) {
        out.push_str(&format!(
            "{:>12.3} {:>12.3} {:>12.3} {:>12.3}\n",
            row.sbp, row.sodium, row.age, row.proteinuria
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::Controller;
    use crate::domain::StructuralParams;

    #[test]
    fn coefficient_renders_three_decimals() {
        assert_eq!(fmt_coefficient(2.2194), "2.219");
        assert_eq!(fmt_coefficient(-0.8756), "-0.876");
        assert_eq!(fmt_coefficient(38.0), "38.000");
    }

    #[test]
    fn summary_lists_visible_formulas() {
        let ctl = Controller::new(7, StructuralParams::new(1.0, 1.0), 100).unwrap();
        let mut display = DisplayState::default();

        let summary = format_run_summary(ctl.snapshot(), &display);
        assert!(summary.contains("sbp ~ sodium + age + proteinuria"));
        assert!(summary.contains("[sign:"));

        display.toggle(ModelSpec::ColliderAdjusted);
        let summary = format_run_summary(ctl.snapshot(), &display);
        assert!(summary.contains("(hidden) Model 3 (collider-adjusted)"));
    }

    #[test]
    fn preview_is_header_plus_requested_rows() {
        let ctl = Controller::new(7, StructuralParams::new(1.0, 1.0), 100).unwrap();
        let preview = format_preview(&ctl.snapshot().dataset, 6);
        assert_eq!(preview.lines().count(), 7);
        assert!(preview.lines().next().unwrap().contains("proteinuria"));
    }
}
