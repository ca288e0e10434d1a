//! UI layout and rendering for the heatmap dashboard.
//!
//! Top to bottom:
//! - Header: title, endpoint and the refresh indicator
//! - Error banner (only after a failed fetch)
//! - Heatmap panel: loading text, the colored grid, or the empty-state text
//! - Meta row: last update, total raw count, sample count
//! - Status bar: key help and fetch phase

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use chrono::Local;

use super::app::App;
use super::widgets::HeatCell;
use crate::fetcher::{DashboardState, FetchPhase};
use crate::heatmap::{format_count, format_updated_at, HeatmapGrid, NO_DATA};

/// Lines per grid cell (label, value, raw count)
const CELL_HEIGHT: u16 = 3;

/// Blank lines between grid rows
const ROW_GAP: u16 = 1;

pub const LOADING_TEXT: &str = "Loading heatmap values…";

/// Top-level rendering function.
pub fn draw(f: &mut Frame, app: &App) {
    let state = app.state();
    let banner_height = if state.error.is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),             // Header
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(0),                // Heatmap panel
            Constraint::Length(4),             // Meta row
            Constraint::Length(1),             // Status bar
        ])
        .split(f.area());

    draw_header(f, app, &state, chunks[0]);
    if let Some(error) = &state.error {
        draw_error_banner(f, error, chunks[1]);
    }
    draw_panel(f, app, &state, chunks[2]);
    draw_meta(f, &state, chunks[3]);
    draw_status_bar(f, app, &state, chunks[4]);
}

// ── Header ──────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, app: &App, state: &DashboardState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Heatwatch ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(18)])
        .split(inner);

    let intro = vec![
        Line::from(Span::styled(
            "HEAT HEALTH MONITOR",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Live Activity Heatmap",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Pulls the latest readings from {} and shows intensity from cool to warm tones.",
            app.endpoint()
        )),
    ];
    f.render_widget(Paragraph::new(intro).wrap(Wrap { trim: true }), cols[0]);

    let button = if state.loading {
        Span::styled(
            " Refreshing… ",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        )
    } else {
        Span::styled(
            " [r] Refresh data ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };
    f.render_widget(
        Paragraph::new(Line::from(button)).alignment(Alignment::Right),
        cols[1],
    );
}

// ── Error Banner ────────────────────────────────────────────────────────────

fn draw_error_banner(f: &mut Frame, error: &str, area: Rect) {
    let banner = Paragraph::new(Span::styled(
        error.to_string(),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Error "),
    );
    f.render_widget(banner, area);
}

// ── Heatmap Panel ───────────────────────────────────────────────────────────

fn draw_panel(f: &mut Frame, app: &App, state: &DashboardState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Heatmap ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if state.is_initial_load() {
        f.render_widget(status_text(LOADING_TEXT), inner);
        return;
    }

    match state.displayable() {
        Some(payload) => {
            let grid = HeatmapGrid::build(&payload.heat_values, &payload.raw_counts, app.max_columns);
            draw_grid(f, &grid, inner);
        }
        None => f.render_widget(status_text(NO_DATA), inner),
    }
}

fn status_text(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray)))
        .alignment(Alignment::Center)
}

fn draw_grid(f: &mut Frame, grid: &HeatmapGrid, area: Rect) {
    let columns = u32::try_from(grid.columns).unwrap_or(u32::MAX);
    let constraints = vec![Constraint::Ratio(1, columns); grid.columns];
    let stride = CELL_HEIGHT + ROW_GAP;

    // Keep the bottom line free for the overflow hint when not every row fits.
    let needed = (grid.row_count() as u64 * u64::from(stride)).saturating_sub(u64::from(ROW_GAP));
    let bottom = if needed <= u64::from(area.height) {
        area.bottom()
    } else {
        area.bottom().saturating_sub(1)
    };

    let mut shown = 0;
    for (row_index, row) in grid.rows().enumerate() {
        let y = area.y.saturating_add((row_index as u16).saturating_mul(stride));
        if y.saturating_add(CELL_HEIGHT) > bottom {
            break;
        }

        let row_area = Rect::new(area.x, y, area.width, CELL_HEIGHT);
        let slots = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints.clone())
            .spacing(1)
            .split(row_area);

        for (cell, slot) in row.iter().zip(slots.iter()) {
            f.render_widget(HeatCell::new(cell), *slot);
        }
        shown += row.len();
    }

    if shown < grid.len() && area.height > 0 {
        let hint = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("… {} more cells (enlarge the terminal)", grid.len() - shown),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
            hint,
        );
    }
}

// ── Meta Row ────────────────────────────────────────────────────────────────

fn draw_meta(f: &mut Frame, state: &DashboardState, area: Rect) {
    let payload = state.payload.as_ref();
    let summary = payload.map(|p| p.summary());

    let mut items = vec![(
        "Updated",
        format_updated_at(payload.and_then(|p| p.updated_at.as_deref())),
    )];
    if let Some(total) = summary.and_then(|s| s.total_raw) {
        items.push(("Total raw count", format_count(total)));
    }
    items.push((
        "Samples",
        summary.map_or(0, |s| s.samples).to_string(),
    ));

    let constraints = vec![Constraint::Ratio(1, items.len() as u32); items.len()];
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for ((label, value), slot) in items.into_iter().zip(slots.iter()) {
        let text = vec![
            Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        f.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
            *slot,
        );
    }
}

// ── Status Bar ──────────────────────────────────────────────────────────────

fn draw_status_bar(f: &mut Frame, app: &App, state: &DashboardState, area: Rect) {
    let (label, bg) = match state.phase {
        FetchPhase::Idle => (" IDLE ", Color::Gray),
        FetchPhase::Loading => (" LOADING ", Color::Yellow),
        FetchPhase::Loaded => (" LIVE ", Color::Green),
        FetchPhase::Errored => (" ERROR ", Color::Red),
    };
    let phase = Span::styled(
        label,
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );

    let fetched = match state.last_success {
        Some(at) => format!("  fetched {}", at.with_timezone(&Local).format("%H:%M:%S")),
        None => String::new(),
    };
    let auto = match app.auto_refresh {
        Some(every) => format!("  auto-refresh {}s", every.as_secs()),
        None => String::new(),
    };

    let status = Line::from(vec![
        phase,
        Span::raw(fetched),
        Span::raw(auto),
        Span::styled("  q:quit  r:refresh ", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(status), area);
}

// ── Tests ───────────────────────────────────────────────────────────────────
