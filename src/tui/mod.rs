//! Ratatui-based terminal UI.
//!
//! The TUI provides two coefficient "sliders" (alpha1/alpha2 in 0.05 steps),
//! per-model display toggles, and renders the jittered scatter with the fitted
//! regression lines plus a cohort preview table.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use rand::prelude::*;
use rand::rngs::StdRng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{Controller, Snapshot};
use crate::cli::SimArgs;
use crate::domain::{DisplayState, ModelSpec, Sign, ALPHA_MAX, ALPHA_MIN, ALPHA_STEP};
use crate::error::AppError;
use crate::models::line_at;

mod plotters_chart;

use plotters_chart::{ColliderChart, LineSpec};

/// Default export targets for the in-TUI export keys.
const CSV_EXPORT_PATH: &str = "collider-data.csv";
const SNAPSHOT_EXPORT_PATH: &str = "collider-snapshot.json";

/// Start the TUI.
pub fn run(args: SimArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::numeric(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(&args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::numeric(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::numeric(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    controller: Controller,
    display: DisplayState,
    selected_field: usize,
    status: String,
}

impl App {
    fn new(args: &SimArgs) -> Result<Self, AppError> {
        let config = crate::app::sim_config_from_args(args);
        let controller = Controller::new(config.seed, config.params, config.sample_count)?;
        Ok(Self {
            controller,
            display: config.display,
            selected_field: 0,
            status: "←/→ adjust the selected coefficient.".to_string(),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::numeric(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::numeric(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::numeric(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1)?,
            KeyCode::Right => self.adjust_field(1)?,
            KeyCode::Char('1') => self.toggle(ModelSpec::Unadjusted),
            KeyCode::Char('2') => self.toggle(ModelSpec::AgeAdjusted),
            KeyCode::Char('3') => self.toggle(ModelSpec::ColliderAdjusted),
            KeyCode::Char('e') => {
                let path = Path::new(CSV_EXPORT_PATH);
                match crate::io::write_dataset_csv(path, &self.controller.snapshot().dataset) {
                    Ok(()) => self.status = format!("Wrote cohort CSV: {CSV_EXPORT_PATH}"),
                    Err(err) => self.status = format!("CSV export failed: {err}"),
                }
            }
            KeyCode::Char('s') => {
                let path = Path::new(SNAPSHOT_EXPORT_PATH);
                match crate::io::write_snapshot_json(path, self.controller.snapshot()) {
                    Ok(()) => {
                        self.status = format!("Wrote snapshot JSON: {SNAPSHOT_EXPORT_PATH}")
                    }
                    Err(err) => self.status = format!("Snapshot export failed: {err}"),
                }
            }
            _ => {}
        }

        Ok(false)
    }

    /// Step the selected coefficient by one UI increment.
    ///
    /// The UI clamps to the valid range before calling into the controller, so
    /// the core's validation never fires from here; holding an arrow key at a
    /// boundary turns into no-op `set_params` calls that skip recomputation.
    fn adjust_field(&mut self, delta: i32) -> Result<(), AppError> {
        let mut params = self.controller.params();
        let target = match self.selected_field {
            0 => &mut params.alpha1,
            _ => &mut params.alpha2,
        };

        let stepped = *target + delta as f64 * ALPHA_STEP;
        // Snap to the 0.05 grid to keep repeated steps from drifting.
        let snapped = (stepped / ALPHA_STEP).round() * ALPHA_STEP;
        *target = snapped.clamp(ALPHA_MIN, ALPHA_MAX);

        let name = if self.selected_field == 0 {
            "alpha1"
        } else {
            "alpha2"
        };
        let value = *target;

        if self.controller.set_params(params)? {
            self.status = format!("{name}: {value:.2} (refit)");
        }
        Ok(())
    }

    fn toggle(&mut self, spec: ModelSpec) {
        self.display.toggle(spec);
        let shown = if self.display.is_shown(spec) {
            "shown"
        } else {
            "hidden"
        };
        self.status = format!("{}: {shown}", spec.display_name());
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let snapshot = self.controller.snapshot();
        let params = self.controller.params();

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("collider", Style::default().fg(Color::Cyan)),
            Span::raw(" — conditioning on a collider flips the sodium effect"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "alpha1: {:.2} | alpha2: {:.2} | seed: {} | n={}",
                params.alpha1,
                params.alpha2,
                self.controller.seed(),
                snapshot.dataset.stats.n_rows,
            ),
            Style::default().fg(Color::Gray),
        )));

        let mut coef_spans: Vec<Span> = Vec::new();
        for derived in &snapshot.derived {
            if !self.display.is_shown(derived.spec) {
                continue;
            }
            if !coef_spans.is_empty() {
                coef_spans.push(Span::raw("  "));
            }
            coef_spans.push(Span::styled(
                format!(
                    "{}: sodium = {}",
                    short_label(derived.spec),
                    crate::report::fmt_coefficient(derived.sodium_coefficient)
                ),
                Style::default().fg(model_tui_color(derived.spec, derived.sign)),
            ));
        }
        if coef_spans.is_empty() {
            coef_spans.push(Span::styled(
                "all models hidden (press 1/2/3)",
                Style::default().fg(Color::Gray),
            ));
        }
        lines.push(Line::from(coef_spans));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(24),
                Constraint::Length(40),
                Constraint::Min(0),
            ])
            .split(chunks[1]);

        self.draw_settings(frame, bottom[0]);
        self.draw_models(frame, bottom[1]);
        self.draw_preview(frame, bottom[2]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("sbp vs sodium")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let snapshot = self.controller.snapshot();
        let (points, lines, x_bounds, y_bounds) = chart_series(snapshot, &self.display);

        let widget = ColliderChart {
            points: &points,
            lines: &lines,
            x_bounds,
            y_bounds,
            x_label: "sodium",
            y_label: "sbp",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let params = self.controller.params();
        let items = vec![
            ListItem::new(format!("alpha1: {:.2}", params.alpha1)),
            ListItem::new(format!("alpha2: {:.2}", params.alpha2)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Coefficients").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_models(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let snapshot = self.controller.snapshot();
        let mut lines: Vec<Line> = Vec::new();
        for (fit, derived) in snapshot.fits.iter().zip(snapshot.derived.iter()) {
            let marker = if self.display.is_shown(fit.spec) {
                "[x]"
            } else {
                "[ ]"
            };
            lines.push(Line::from(Span::styled(
                format!("{marker} {}", fit.spec.formula()),
                Style::default().fg(model_tui_color(fit.spec, derived.sign)),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Models (1/2/3)").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_preview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = (area.height as usize).saturating_sub(3);
        let preview =
            crate::report::format_preview(&self.controller.snapshot().dataset, rows);

        let p = Paragraph::new(preview)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().title("Cohort preview").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  1/2/3 toggle  e csv  s snapshot  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn short_label(spec: ModelSpec) -> &'static str {
    match spec {
        ModelSpec::Unadjusted => "M1",
        ModelSpec::AgeAdjusted => "M2",
        ModelSpec::ColliderAdjusted => "M3",
    }
}

/// Ratatui color for a model's text. The collider model follows its sign.
fn model_tui_color(spec: ModelSpec, sign: Sign) -> Color {
    match spec {
        ModelSpec::Unadjusted => Color::Cyan,
        ModelSpec::AgeAdjusted => Color::Yellow,
        ModelSpec::ColliderAdjusted => match sign {
            Sign::Positive => Color::Green,
            Sign::NonPositive => Color::Red,
        },
    }
}

/// Plotters color for a model's fitted line. Mirrors `model_tui_color`.
fn model_line_color(spec: ModelSpec, sign: Sign) -> RGBColor {
    match spec {
        ModelSpec::Unadjusted => RGBColor(0, 255, 255),
        ModelSpec::AgeAdjusted => RGBColor(255, 255, 0),
        ModelSpec::ColliderAdjusted => match sign {
            Sign::Positive => RGBColor(0, 255, 0),
            Sign::NonPositive => RGBColor(255, 0, 0),
        },
    }
}

/// Build chart series for Plotters.
///
/// The scatter gets a small deterministic jitter (display only — the dataset
/// itself is never touched) so overlapping subjects stay distinguishable in
/// low-resolution terminal cells.
fn chart_series(
    snapshot: &Snapshot,
    display: &DisplayState,
) -> (Vec<(f64, f64)>, Vec<LineSpec>, [f64; 2], [f64; 2]) {
    let stats = &snapshot.dataset.stats;

    let mut x0 = stats.sodium_min;
    let mut x1 = stats.sodium_max;
    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        x0 = 2.0;
        x1 = 5.0;
    }
    let x_bounds = [x0, x1];

    let mut y_min = stats.sbp_min;
    let mut y_max = stats.sbp_max;

    let n_line = 50usize;
    let mut lines = Vec::new();
    for (fit, derived) in snapshot.fits.iter().zip(snapshot.derived.iter()) {
        if !display.is_shown(fit.spec) {
            continue;
        }
        let mut points = Vec::with_capacity(n_line);
        for i in 0..n_line {
            let u = i as f64 / (n_line as f64 - 1.0);
            let x = x0 + u * (x1 - x0);
            let y = line_at(fit, stats, x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
            points.push((x, y));
        }
        lines.push(LineSpec {
            points,
            color: model_line_color(fit.spec, derived.sign),
        });
    }

    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    // Seed from the snapshot so the jitter is stable between redraws and only
    // changes when the cohort itself changes.
    let mut rng = StdRng::seed_from_u64(snapshot.dataset.seed ^ snapshot.version);
    let jx = (x1 - x0) * 0.01;
    let jy = (y_bounds[1] - y_bounds[0]) * 0.01;
    let points = snapshot
        .dataset
        .rows
        .iter()
        .map(|row| {
            (
                row.sodium + rng.gen_range(-jx..=jx),
                row.sbp + rng.gen_range(-jy..=jy),
            )
        })
        .collect();

    (points, lines, x_bounds, y_bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StructuralParams;

    #[test]
    fn chart_series_jitter_is_stable_per_snapshot() {
        let ctl = Controller::new(7, StructuralParams::new(1.0, 1.0), 100).unwrap();
        let display = DisplayState::default();

        let (a, lines_a, ..) = chart_series(ctl.snapshot(), &display);
        let (b, ..) = chart_series(ctl.snapshot(), &display);
        assert_eq!(a, b);
        assert_eq!(lines_a.len(), 3);
    }

    #[test]
    fn chart_series_skips_hidden_models() {
        let ctl = Controller::new(7, StructuralParams::new(1.0, 1.0), 100).unwrap();
        let mut display = DisplayState::default();
        display.toggle(ModelSpec::AgeAdjusted);

        let (_, lines, ..) = chart_series(ctl.snapshot(), &display);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn line_bounds_cover_a_negative_collider_line() {
        // Strong coupling drives the collider line's slope negative; the y
        // bounds must still contain it across the sodium range.
        let mut ctl = Controller::new(777, StructuralParams::new(0.5, 0.05), 500).unwrap();
        ctl.set_params(StructuralParams::new(5.0, 5.0)).unwrap();

        let display = DisplayState::default();
        let (_, lines, _, y_bounds) = chart_series(ctl.snapshot(), &display);
        for line in &lines {
            for &(_, y) in &line.points {
                assert!(y >= y_bounds[0] && y <= y_bounds[1]);
            }
        }
    }
}
