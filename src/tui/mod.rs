//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing a chart (kind, x/y columns,
//! date aggregation) and toggling cleaning steps, then renders the chart and
//! dataset summary over the cleaned table. Errors (a rejected step, a pie on
//! a numeric column) land in the status line; the last good table stays up.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, SessionOutput};
use crate::chart::build_series;
use crate::cli::TuiArgs;
use crate::clean;
use crate::domain::{
    AggregatedSeries, Aggregation, ChartKind, ChartRequest, CleaningPlan, DataSource,
    SessionConfig,
};
use crate::error::AppError;
use crate::io::counter::{ExportCounter, FileCounter};
use crate::io::ingest::IngestedTable;

mod plotters_chart;

use plotters_chart::SeriesChart;

const CLEANED_CSV_NAME: &str = "cleaned_dataset.csv";
const REPORT_HTML_NAME: &str = "profiling_report.html";

/// Chart-request fields come first in the settings list; the eight cleaning
/// toggles follow.
const CHART_FIELDS: usize = 4;
const STEP_COUNT: usize = 8;
const FIELD_COUNT: usize = CHART_FIELDS + STEP_COUNT;

const STEP_NAMES: [&str; STEP_COUNT] = [
    "drop missing",
    "lowercase",
    "drop duplicates",
    "parse dates",
    "remove outliers",
    "standardize",
    "one-hot encode",
    "bool -> int",
];

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let source = crate::app::resolve_tui_source(&args)?;
    let mut app = App::new(source)?;

    let _guard = TerminalGuard::new()?;

    let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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
    source: DataSource,
    ingest: IngestedTable,
    run: SessionOutput,
    /// One toggle per pipeline step, in declared order.
    steps_enabled: [bool; STEP_COUNT],
    kind: ChartKind,
    x_index: usize,
    y_index: usize,
    aggregation: Aggregation,
    series: Option<AggregatedSeries>,
    selected_field: usize,
    status: String,
}

impl App {
    fn new(source: DataSource) -> Result<Self, AppError> {
        let ingest = pipeline::load_source(&source)?;
        let config = SessionConfig {
            source: source.clone(),
            plan: CleaningPlan::default(),
        };
        let run = pipeline::run_session_with_table(&config, ingest.clone())?;

        let mut app = Self {
            source,
            ingest,
            run,
            steps_enabled: [false; STEP_COUNT],
            kind: ChartKind::Line,
            x_index: 0,
            y_index: 0,
            aggregation: Aggregation::None,
            series: None,
            selected_field: 0,
            status: "Ready.".to_string(),
        };
        app.pick_default_axes();
        app.rebuild_series();
        Ok(app)
    }

    /// Default to a date x column and a numeric y column when present.
    fn pick_default_axes(&mut self) {
        let table = &self.run.cleaned;
        if let Some(idx) = table
            .columns()
            .iter()
            .position(|c| c.as_temporal().is_some())
        {
            self.x_index = idx;
            self.aggregation = Aggregation::Monthly;
        }
        if let Some(idx) = table.columns().iter().position(|c| c.as_numeric().is_some()) {
            self.y_index = idx;
        }
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
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.selected_field >= CHART_FIELDS {
                    self.toggle_step(self.selected_field - CHART_FIELDS);
                }
            }
            KeyCode::Char('r') => self.reload()?,
            KeyCode::Char('e') => match crate::io::export::write_table_csv(
                std::path::Path::new(CLEANED_CSV_NAME),
                &self.run.cleaned,
            ) {
                Ok(()) => self.status = format!("Wrote {CLEANED_CSV_NAME}."),
                Err(err) => self.status = format!("Export failed: {err}"),
            },
            KeyCode::Char('h') => self.export_report(),
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(&self.source, &self.run) {
                    Ok(path) => self.status = format!("Wrote debug bundle: {}", path.display()),
                    Err(err) => self.status = format!("Debug write failed: {err}"),
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn adjust_field(&mut self, delta: i32) {
        // Status is set before the rebuild so a chart error can override it.
        match self.selected_field {
            0 => {
                self.kind = cycle_kind(self.kind, delta);
                self.status = format!("chart: {}", self.kind.display_name());
                self.rebuild_series();
            }
            1 => {
                self.x_index = cycle_index(self.x_index, self.column_count(), delta);
                self.status = format!("x: {}", self.column_name(self.x_index));
                self.rebuild_series();
            }
            2 => {
                self.y_index = cycle_index(self.y_index, self.column_count(), delta);
                self.status = format!("y: {}", self.column_name(self.y_index));
                self.rebuild_series();
            }
            3 => {
                self.aggregation = cycle_aggregation(self.aggregation, delta);
                self.status = format!("aggregation: {}", self.aggregation.display_name());
                self.rebuild_series();
            }
            field => self.toggle_step(field - CHART_FIELDS),
        }
    }

    fn toggle_step(&mut self, step: usize) {
        self.steps_enabled[step] = !self.steps_enabled[step];
        let label = STEP_NAMES[step];
        self.status = format!(
            "{label}: {}",
            if self.steps_enabled[step] { "on" } else { "off" }
        );
        if let Err(err) = self.reclean() {
            // Roll the toggle back; the last good table stays up.
            self.steps_enabled[step] = !self.steps_enabled[step];
            self.status = format!("{label} rejected: {err}");
        }
    }

    /// Re-run the cleaning pipeline from the raw table.
    fn reclean(&mut self) -> Result<(), AppError> {
        let config = SessionConfig {
            source: self.source.clone(),
            plan: self.current_plan(),
        };
        let run = pipeline::run_session_with_table(&config, self.ingest.clone())?;
        self.run = run;
        self.clamp_axes();
        self.rebuild_series();
        Ok(())
    }

    /// The plan implied by the toggles, with column-scoped steps targeting
    /// their eligible candidates in the raw table.
    fn current_plan(&self) -> CleaningPlan {
        let raw = &self.ingest.table;
        CleaningPlan {
            drop_missing: self.steps_enabled[0],
            lowercase: if self.steps_enabled[1] {
                clean::lowercase_candidates(raw)
            } else {
                Vec::new()
            },
            drop_duplicates: self.steps_enabled[2],
            parse_dates: if self.steps_enabled[3] {
                clean::parse_date_candidates(raw)
            } else {
                Vec::new()
            },
            remove_outliers: self.steps_enabled[4],
            standardize: if self.steps_enabled[5] {
                clean::standardize_candidates(raw)
            } else {
                Vec::new()
            },
            one_hot: if self.steps_enabled[6] {
                clean::one_hot_candidates(raw)
            } else {
                Vec::new()
            },
            bool_to_int: if self.steps_enabled[7] {
                clean::bool_to_int_candidates(raw)
            } else {
                Vec::new()
            },
        }
    }

    fn reload(&mut self) -> Result<(), AppError> {
        if let DataSource::Demo { seed, .. } = &mut self.source {
            *seed = seed.wrapping_add(1);
        }
        self.ingest = pipeline::load_source(&self.source)?;
        match self.reclean() {
            Ok(()) => self.status = format!("Reloaded: {}", self.source.label()),
            Err(err) => self.status = format!("Reload clean failed: {err}"),
        }
        Ok(())
    }

    fn rebuild_series(&mut self) {
        let request = self.current_request();
        match build_series(&self.run.cleaned, &request) {
            Ok(series) => {
                self.series = Some(series);
            }
            Err(err) => {
                self.series = None;
                self.status = format!("chart: {err}");
            }
        }
    }

    fn current_request(&self) -> ChartRequest {
        ChartRequest {
            kind: self.kind,
            x: self.column_name(self.x_index),
            y: if self.kind.is_single_variable() {
                None
            } else {
                Some(self.column_name(self.y_index))
            },
            aggregation: self.aggregation,
        }
    }

    fn export_report(&mut self) {
        let meta = crate::report::ReportMeta {
            title: "Profiling Report".to_string(),
            description: String::new(),
            source: self.source.label(),
            generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        let path = std::path::Path::new(REPORT_HTML_NAME);
        match crate::io::export::write_report_html(path, &self.run.summary, &meta) {
            Ok(()) => {
                let counter = FileCounter::from_env();
                match counter.increment() {
                    Ok(count) => {
                        self.status = format!("Wrote {REPORT_HTML_NAME} (export #{count}).");
                    }
                    Err(err) => {
                        self.status = format!("Report written; counter failed: {err}");
                    }
                }
            }
            Err(err) => self.status = format!("Report export failed: {err}"),
        }
    }

    fn column_count(&self) -> usize {
        self.run.cleaned.column_count().max(1)
    }

    fn column_name(&self, index: usize) -> String {
        self.run
            .cleaned
            .columns()
            .get(index)
            .map(|c| c.name().to_string())
            .unwrap_or_default()
    }

    /// Cleaning can add/remove columns; keep the axis indices valid.
    fn clamp_axes(&mut self) {
        let max = self.run.cleaned.column_count().saturating_sub(1);
        self.x_index = self.x_index.min(max);
        self.y_index = self.y_index.min(max);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("ds", Style::default().fg(Color::Cyan)),
            Span::raw(" — tabular data explorer"),
        ]));

        let raw = &self.ingest.table;
        let cleaned = &self.run.cleaned;
        lines.push(Line::from(Span::styled(
            format!(
                "source: {} | raw: {}x{} | cleaned: {}x{} | duplicates: {}",
                self.source.label(),
                raw.row_count(),
                raw.column_count(),
                cleaned.row_count(),
                cleaned.column_count(),
                self.run.summary.duplicate_rows,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(FIELD_COUNT as u16 + 2)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("Chart ({})", self.kind.display_name());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(series) = &self.series else {
            let msg = Paragraph::new("No chart (see status line).")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        match SeriesChart::from_series(series) {
            Some(widget) => frame.render_widget(widget, inner),
            None => {
                // Box/pie render as deterministic text.
                let txt = crate::plot::render_series(
                    series,
                    inner.width.saturating_sub(2) as usize,
                    inner.height.saturating_sub(2) as usize,
                );
                let p = Paragraph::new(txt);
                frame.render_widget(p, inner);
            }
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::with_capacity(FIELD_COUNT);
        items.push(ListItem::new(format!(
            "Chart: {}",
            self.kind.display_name()
        )));
        items.push(ListItem::new(format!("X: {}", self.column_name(self.x_index))));
        let y_label = if self.kind.is_single_variable() {
            "-".to_string()
        } else {
            self.column_name(self.y_index)
        };
        items.push(ListItem::new(format!("Y: {y_label}")));
        items.push(ListItem::new(format!(
            "Aggregation: {}",
            self.aggregation.display_name()
        )));

        for (idx, name) in STEP_NAMES.iter().enumerate() {
            let mark = if self.steps_enabled[idx] { "x" } else { " " };
            items.push(ListItem::new(format!("[{mark}] {name}")));
        }

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  space toggle  e csv  h report  d debug  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(
                &self.status,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn cycle_kind(kind: ChartKind, delta: i32) -> ChartKind {
    const ORDER: [ChartKind; 6] = [
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::Box,
        ChartKind::Pie,
    ];
    let pos = ORDER.iter().position(|k| *k == kind).unwrap_or(0);
    ORDER[cycle_index(pos, ORDER.len(), delta)]
}

fn cycle_aggregation(agg: Aggregation, delta: i32) -> Aggregation {
    const ORDER: [Aggregation; 4] = [
        Aggregation::None,
        Aggregation::Yearly,
        Aggregation::Monthly,
        Aggregation::Daily,
    ];
    let pos = ORDER.iter().position(|a| *a == agg).unwrap_or(0);
    ORDER[cycle_index(pos, ORDER.len(), delta)]
}

fn cycle_index(current: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i32;
    let next = (current as i32 + delta).rem_euclid(len);
    next as usize
}
