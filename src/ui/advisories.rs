//! Advisories view rendering.
//!
//! Merged advisory table across all units, most recent first, colored by
//! urgency.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;

/// Render the merged advisory table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let advisories = app.store.all_advisories();

    if advisories.is_empty() {
        let block = Block::default()
            .title(" Advisories (0) ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let paragraph = Paragraph::new("No advisories, all batches steady")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Batch"),
        Cell::from("Urgency"),
        Cell::from("Transition"),
        Cell::from("Advisory"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = advisories
        .iter()
        .map(|(unit_id, advisory)| {
            let urgency_style = app.theme.urgency_style(advisory.urgency);
            let when = advisory.occurred_at.with_timezone(&Local).format("%H:%M:%S");

            Row::new(vec![
                Cell::from(when.to_string()),
                Cell::from(format!("{}", unit_id)),
                Cell::from(advisory.urgency.label()).style(urgency_style),
                Cell::from(advisory.transition_key()),
                Cell::from(format!("{}: {}", advisory.title, advisory.body)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(9),  // Time
        Constraint::Min(6),  // Batch
        Constraint::Min(8),  // Urgency
        Constraint::Min(24), // Transition
        Constraint::Fill(1), // Advisory text
    ];

    let selected = app.selected_advisory_index.min(advisories.len().saturating_sub(1));
    let title = format!(
        " Advisories ({}) [{}/{}] ",
        advisories.len(),
        selected + 1,
        advisories.len()
    );

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
