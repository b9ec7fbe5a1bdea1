//! Overview view rendering.
//!
//! Displays a table of all units with tier, quality score, live readings
//! against their ideals, a score sparkline, and the advisory count.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::BatchRecord;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the Overview showing all units in a table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Batch"),
        Cell::from("Tier"),
        Cell::from("Score"),
        Cell::from("pH a/i"),
        Cell::from("Temp a/i"),
        Cell::from("CO2 a/i"),
        Cell::from("Trend"),
        Cell::from("Advis"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app.store.records().map(|record| unit_row(app, record)).collect();

    let widths = [
        Constraint::Min(6),  // Batch
        Constraint::Min(6),  // Tier
        Constraint::Min(7),  // Score
        Constraint::Fill(2), // pH actual/ideal
        Constraint::Fill(2), // Temp
        Constraint::Fill(2), // CO2
        Constraint::Min(8),  // Trend sparkline
        Constraint::Min(5),  // Advisory count
    ];

    let selected = app.selected_unit_index.min(app.store.len().saturating_sub(1));
    let position_info = if app.store.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", selected + 1, app.store.len())
    };
    let title = format!(" Batches ({}){} ", app.store.len(), position_info);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn unit_row<'a>(app: &App, record: &'a BatchRecord) -> Row<'a> {
    let Some(latest) = record.latest() else {
        // Tracked but nothing received yet
        return Row::new(vec![
            Cell::from(format!("{}", record.id)),
            Cell::from("-"),
            Cell::from("-"),
            Cell::from("-"),
            Cell::from("-"),
            Cell::from("-"),
            Cell::from("        "),
            Cell::from("-"),
        ]);
    };

    let tier_cell = match record.current_tier {
        Some(tier) => Cell::from(tier.symbol()).style(app.theme.tier_style(tier)),
        None => Cell::from("-"),
    };
    let score_cell = match record.current_tier {
        Some(tier) => {
            Cell::from(format!("{:.1}", latest.score)).style(app.theme.tier_style(tier))
        }
        None => Cell::from(format!("{:.1}", latest.score)),
    };

    let sparkline = render_sparkline(&record.window.scores());

    Row::new(vec![
        Cell::from(format!("{}", record.id)),
        tier_cell,
        score_cell,
        Cell::from(format!("{:.2}/{:.2}", latest.actual.ph, latest.ideal.ph)),
        Cell::from(format!(
            "{:.1}/{:.1}",
            latest.actual.temperature, latest.ideal.temperature
        )),
        Cell::from(format!("{:.1}/{:.1}", latest.actual.co2, latest.ideal.co2)),
        Cell::from(sparkline),
        Cell::from(format!("{}", record.advisories.len())),
    ])
}

/// Render the last eight scores as a sparkline, normalized over the
/// values shown so small quality movements stay visible.
fn render_sparkline(scores: &[f64]) -> String {
    if scores.is_empty() {
        return "        ".to_string(); // 8 spaces placeholder
    }

    let values: Vec<f64> = scores.iter().rev().take(8).rev().copied().collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|&v| {
            let level = if span > f64::EPSILON {
                ((v - min) / span * 7.0).round() as usize
            } else {
                3
            };
            SPARKLINE_CHARS[level.min(7)]
        })
        .collect()
}
