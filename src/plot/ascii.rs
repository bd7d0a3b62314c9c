//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed subjects: `o`
//! - fitted lines: digits `1`/`2`/`3`, one per visible model

use crate::app::pipeline::Snapshot;
use crate::domain::{DisplayState, ModelSpec};
use crate::models::line_at;

/// Render the scatter of (sodium, sbp) with one fitted line per visible model.
pub fn render_ascii_plot(
    snapshot: &Snapshot,
    display: &DisplayState,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let stats = &snapshot.dataset.stats;
    let (x_min, x_max) = pad_range(stats.sodium_min, stats.sodium_max, 0.02);

    // The y-range covers both the observations and every visible line, so a
    // strongly negative collider line stays on the canvas.
    let mut y_min = stats.sbp_min;
    let mut y_max = stats.sbp_max;
    for fit in visible_fits(snapshot, display) {
        for edge in [x_min, x_max] {
            let y = line_at(fit, stats, edge);
            if y.is_finite() {
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
    }
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for fit in visible_fits(snapshot, display) {
        let ch = line_char(fit.spec);
        for col in 0..width {
            let u = col as f64 / (width - 1) as f64;
            let x = x_min + u * (x_max - x_min);
            let y = line_at(fit, stats, x);
            if y >= y_min && y <= y_max {
                let row = map_y(y, y_min, y_max, height);
                grid[row][col] = ch;
            }
        }
    }

    for obs in &snapshot.dataset.rows {
        let col = map_x(obs.sodium, x_min, x_max, width);
        let row = map_y(obs.sbp, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: sodium=[{x_min:.2}, {x_max:.2}] | sbp=[{y_min:.1}, {y_max:.1}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("o subjects");
    for fit in visible_fits(snapshot, display) {
        out.push_str(&format!(
            "  {} {}",
            line_char(fit.spec),
            fit.spec.formula()
        ));
    }
    out.push('\n');

    out
}

fn visible_fits<'a>(
    snapshot: &'a Snapshot,
    display: &'a DisplayState,
) -> impl Iterator<Item = &'a crate::domain::FittedModel> {
    snapshot
        .fits
        .iter()
        .filter(|fit| display.is_shown(fit.spec))
}

fn line_char(spec: ModelSpec) -> char {
    match spec {
        ModelSpec::Unadjusted => '1',
        ModelSpec::AgeAdjusted => '2',
        ModelSpec::ColliderAdjusted => '3',
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    if !(min.is_finite() && max.is_finite()) || max < min {
        return (0.0, 1.0);
    }
    let pad = ((max - min).abs() * frac).max(1e-9);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    ((u * (width - 1) as f64).round() as usize).min(width - 1)
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the canvas.
    let row = ((1.0 - u) * (height - 1) as f64).round() as usize;
    row.min(height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::Controller;
    use crate::domain::StructuralParams;

    #[test]
    fn plot_is_deterministic_and_sized() {
        let ctl = Controller::new(7, StructuralParams::new(1.0, 1.0), 100).unwrap();
        let display = DisplayState::default();

        let a = render_ascii_plot(ctl.snapshot(), &display, 80, 20);
        let b = render_ascii_plot(ctl.snapshot(), &display, 80, 20);
        assert_eq!(a, b);

        // Header + canvas rows + legend.
        assert_eq!(a.lines().count(), 22);
        assert!(a.contains('o'));
    }

    #[test]
    fn hidden_models_leave_no_line_or_legend_entry() {
        let ctl = Controller::new(7, StructuralParams::new(1.0, 1.0), 50).unwrap();
        let mut display = DisplayState::default();
        display.toggle(ModelSpec::Unadjusted);
        display.toggle(ModelSpec::AgeAdjusted);
        display.toggle(ModelSpec::ColliderAdjusted);

        let plot = render_ascii_plot(ctl.snapshot(), &display, 60, 15);
        assert!(!plot.contains("sbp ~"));
        // Canvas rows (between header and legend) hold only subjects.
        for line in plot.lines().skip(1).take(15) {
            assert!(line.chars().all(|c| c == ' ' || c == 'o'), "{line}");
        }
    }
}
