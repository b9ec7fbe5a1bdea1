//! Trends view rendering.
//!
//! Charts the selected unit's measurement window: actual readings
//! against the golden-standard ideal for one parameter at a time.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the Trends chart for the selected unit.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(unit_id) = app.selected_unit_id() else {
        draw_placeholder(frame, app, area, " Trends ", "No batches tracked");
        return;
    };
    let Some(record) = app.store.record(unit_id) else {
        draw_placeholder(frame, app, area, " Trends ", "No batches tracked");
        return;
    };

    let param = app.trend_param;
    let actual = record.window.actual_points(param);
    let ideal = record.window.ideal_points(param);

    if actual.is_empty() {
        let title = format!(" Batch {}: collecting... ", unit_id);
        draw_placeholder(frame, app, area, &title, "Waiting for measurements");
        return;
    }

    // Bounds across both traces, with a little headroom
    let values = actual.iter().chain(ideal.iter()).map(|(_, v)| *v);
    let min_val = values.clone().fold(f64::MAX, f64::min);
    let max_val = values.fold(f64::MIN, f64::max);
    let (y_min, y_max) = pad_bounds(min_val, max_val);

    let x_min = actual.first().map(|(t, _)| *t).unwrap_or(0.0);
    let x_max = actual.last().map(|(t, _)| *t).unwrap_or(x_min).max(x_min + 0.5);

    let latest = actual.last().map(|(_, v)| *v).unwrap_or(0.0);
    let latest_ideal = ideal.last().map(|(_, v)| *v).unwrap_or(0.0);

    let datasets = vec![
        Dataset::default()
            .name(format!("actual {:.2}", latest))
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(app.theme.highlight))
            .data(&actual),
        Dataset::default()
            .name(format!("ideal {:.2}", latest_ideal))
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(app.theme.border))
            .data(&ideal),
    ];

    let unit_suffix = if param.unit().is_empty() {
        String::new()
    } else {
        format!(" {}", param.unit())
    };
    let title = format!(
        " Batch {}: {}{}  [p:cycle]  last {} samples ",
        unit_id,
        param.label(),
        unit_suffix,
        actual.len()
    );

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .title("hours")
                .bounds([x_min, x_max])
                .labels(vec![
                    Line::from(format!("{:.1}", x_min)),
                    Line::from(format!("{:.1}", x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(param.label())
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format!("{:.2}", y_min)),
                    Line::from(format!("{:.2}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Widen flat ranges so a steady trace doesn't collapse onto one line.
fn pad_bounds(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span < 1e-6 {
        (min - 0.5, max + 0.5)
    } else {
        (min - span * 0.05, max + span * 0.05)
    }
}

fn draw_placeholder(frame: &mut Frame, app: &App, area: Rect, title: &str, hint: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let paragraph = Paragraph::new(hint.to_string())
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}
