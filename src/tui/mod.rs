//! Ratatui-based terminal UI.
//!
//! Two views share one event loop:
//! - a choropleth tile map with a cursor; the side panel shows the hovered state
//! - the poverty/uninsured scatter with its trend line; ←/→ walks the states

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{DatasetRun, TrendRun};
use crate::data::FipsLookup;
use crate::data::fips::display_name;
use crate::domain::tiles::TILES;
use crate::error::AppError;

mod plotters_chart;
mod tile_map;

use plotters_chart::TrendChart;
use tile_map::{TileMap, neighbor};

/// Show a choropleth for one dataset.
pub fn run_map(run: DatasetRun, lookup: FipsLookup) -> Result<(), AppError> {
    let selected = TILES
        .iter()
        .map(|&(abbr, _, _)| abbr)
        .find(|abbr| run.table.by_abbreviation(abbr).is_some())
        .unwrap_or("AL");
    launch(App {
        view: View::Map { run, selected },
        lookup,
    })
}

/// Show the poverty/uninsured scatter.
pub fn run_trend(run: TrendRun, lookup: FipsLookup) -> Result<(), AppError> {
    launch(App {
        view: View::Trend { run, selected: 0 },
        lookup,
    })
}

fn launch(mut app: App) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::usage(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::usage(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::usage(format!("Failed to enter alternate screen: {e}")));
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

enum View {
    Map { run: DatasetRun, selected: &'static str },
    Trend { run: TrendRun, selected: usize },
}

struct App {
    view: View,
    lookup: FipsLookup,
}

impl App {
    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::usage(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::usage(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::usage(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
            return true;
        }

        match &mut self.view {
            View::Map { selected, .. } => {
                let step = match code {
                    KeyCode::Up => Some((-1, 0)),
                    KeyCode::Down => Some((1, 0)),
                    KeyCode::Left => Some((0, -1)),
                    KeyCode::Right => Some((0, 1)),
                    _ => None,
                };
                if let Some((dr, dc)) = step {
                    if let Some(next) = neighbor(*selected, dr, dc) {
                        *selected = next;
                    }
                }
            }
            View::Trend { run, selected } => {
                let n = run.trend.points.len();
                if n > 0 {
                    match code {
                        KeyCode::Right | KeyCode::Down => *selected = (*selected + 1) % n,
                        KeyCode::Left | KeyCode::Up => *selected = (*selected + n - 1) % n,
                        _ => {}
                    }
                }
            }
        }
        false
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(34)])
            .split(chunks[1]);
        match &self.view {
            View::Map { run, selected } => {
                self.draw_map(frame, body[0], run, selected);
                self.draw_map_details(frame, body[1], run, selected);
            }
            View::Trend { run, selected } => {
                self.draw_chart(frame, body[0], run, *selected);
                self.draw_trend_details(frame, body[1], run, *selected);
            }
        }

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (title, detail) = match &self.view {
            View::Map { run, .. } => (
                run.dataset.map_title(run.year),
                format!(
                    "states: {} | population covered: {} | color: {}",
                    run.table.len(),
                    run.total_population,
                    run.dataset.ratio_label()
                ),
            ),
            View::Trend { run, .. } => (
                format!("Trend between Poverty and Uninsured People by State - {}", run.year),
                format!(
                    "n={} | r={:.3} | r²={:.3} | uninsured% = {:.2} + {:.3} × poverty%",
                    run.trend.points.len(),
                    run.trend.pearson_r,
                    run.trend.r_squared,
                    run.trend.line.intercept,
                    run.trend.line.slope,
                ),
            ),
        };

        let lines = vec![
            Line::from(Span::styled(title, Style::default().fg(Color::Cyan))),
            Line::from(Span::styled(detail, Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_map(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &DatasetRun, selected: &str) {
        let block = Block::default().title("Map").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);
        frame.render_widget(
            TileMap {
                table: &run.table,
                scale: run.dataset.color_scale(),
                selected: Some(selected),
            },
            inner,
        );
    }

    fn draw_map_details(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &DatasetRun, selected: &str) {
        let mut lines: Vec<Line> = Vec::new();
        match run.table.by_abbreviation(selected) {
            Some(state) => {
                let name = self
                    .lookup
                    .name_for(&state.fips_code)
                    .map(display_name)
                    .unwrap_or_else(|| selected.to_string());
                lines.push(Line::from(Span::styled(
                    name,
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!("FIPS: {}", state.fips_code)));
                lines.push(Line::from(format!("{}: {:.2}", run.dataset.ratio_label(), state.ratio)));
                lines.push(Line::from(format!(
                    "{}: {}",
                    run.dataset.complement_label(),
                    state.complement_total
                )));
                lines.push(Line::from(format!(
                    "{}: {}",
                    run.dataset.subject_label(),
                    state.subject_total
                )));
                lines.push(Line::from(format!("population: {}", state.population_total)));
            }
            None => lines.push(Line::from(format!("{selected}: no data"))),
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("State").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &TrendRun, selected: usize) {
        let block = Block::default().title("Poverty vs uninsured").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let points = run.trend.xy();
        let line = run.trend.line_samples(200);
        let x_bounds = pad(run.trend.x_bounds());
        let mut y_bounds = run.trend.y_bounds();
        for &(_, y) in &line {
            y_bounds[0] = y_bounds[0].min(y);
            y_bounds[1] = y_bounds[1].max(y);
        }

        let widget = TrendChart {
            line: &line,
            points: &points,
            highlight: points.get(selected).copied(),
            x_bounds,
            y_bounds: pad(y_bounds),
            x_label: "% in poverty",
            y_label: "% uninsured",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_trend_details(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &TrendRun, selected: usize) {
        let mut lines: Vec<Line> = Vec::new();
        if let Some(p) = run.trend.points.get(selected) {
            let name = self
                .lookup
                .name_for_state(p.state_code)
                .map(display_name)
                .unwrap_or_else(|| p.abbreviation.clone());
            let fitted = run.trend.line.predict(p.poverty_ratio);
            lines.push(Line::from(Span::styled(
                format!("{name} ({})", p.abbreviation),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("% in poverty: {:.2}", p.poverty_ratio)));
            lines.push(Line::from(format!("% uninsured: {:.2}", p.uninsured_ratio)));
            lines.push(Line::from(format!("trend: {fitted:.2}")));
            lines.push(Line::from(format!("residual: {:+.2}", p.uninsured_ratio - fitted)));
        }
        if !run.trend.unmatched.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} state(s) in one table only", run.trend.unmatched.len()),
                Style::default().fg(Color::Yellow),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("State").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.view {
            View::Map { .. } => "←/↑/↓/→ move  q quit",
            View::Trend { .. } => "←/→ previous/next state  q quit",
        };
        let p = Paragraph::new(Line::from(Span::styled(help, Style::default().fg(Color::Gray))))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn pad([lo, hi]: [f64; 2]) -> [f64; 2] {
    let p = ((hi - lo).abs() * 0.05).max(1e-6);
    [lo - p, hi + p]
}
