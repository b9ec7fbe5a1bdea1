//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::QualityTier;
use crate::feed::LinkStatus;

/// Render the header bar with fleet-wide quality overview.
///
/// Displays: worst-tier indicator, unit counts by tier, link status.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if app.last_update.is_none() {
        let line = Line::from(vec![
            Span::styled(" FERMWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| "),
            Span::styled(app.link.label(), link_style(app)),
            Span::raw(" | waiting for stream..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    // Count units by current tier
    let mut perfect = 0;
    let mut acceptable = 0;
    let mut concerning = 0;
    let mut failed = 0;

    for record in app.store.records() {
        match record.current_tier {
            Some(QualityTier::Perfect) => perfect += 1,
            Some(QualityTier::Acceptable) => acceptable += 1,
            Some(QualityTier::Concerning) => concerning += 1,
            Some(QualityTier::Failed) => failed += 1,
            None => {}
        }
    }

    // Overall indicator takes the worst tier present
    let dot_style = if failed > 0 {
        app.theme.tier_style(QualityTier::Failed)
    } else if concerning > 0 {
        app.theme.tier_style(QualityTier::Concerning)
    } else if acceptable > 0 {
        app.theme.tier_style(QualityTier::Acceptable)
    } else {
        app.theme.tier_style(QualityTier::Perfect)
    };

    let dim_zero = |n: usize, style: Style| {
        if n > 0 {
            Span::styled(format!("{}", n), style)
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let line = Line::from(vec![
        Span::styled(" ● ", dot_style),
        Span::styled("FERMWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        dim_zero(perfect, Style::default().fg(app.theme.good)),
        Span::raw(" perf "),
        dim_zero(acceptable, Style::default().fg(app.theme.highlight)),
        Span::raw(" ok "),
        dim_zero(concerning, Style::default().fg(app.theme.warning)),
        Span::raw(" warn "),
        dim_zero(
            failed,
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" fail │ "),
        Span::styled(
            format!("{}", app.store.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" batches │ link: "),
        Span::styled(app.link.label(), link_style(app)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn link_style(app: &App) -> Style {
    match app.link {
        LinkStatus::Connected => Style::default().fg(app.theme.good),
        LinkStatus::Connecting => Style::default().fg(app.theme.warning),
        LinkStatus::Disconnected => {
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD)
        }
    }
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Overview "),
        Line::from(" 2:Trends "),
        Line::from(" 3:Advisories "),
    ];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Trends => 1,
        View::Advisories => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: feed description, time since last update, available controls.
/// Also displays temporary status messages and faults.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(updated) = app.last_update {
        let controls = match app.current_view {
            View::Overview => "↑↓:select Enter:trends e:export Tab:switch ?:help q:quit",
            View::Trends => "p:parameter ↑↓:batch e:export Tab:switch ?:help q:quit",
            View::Advisories => "↑↓:scroll Tab:switch ?:help q:quit",
        };

        format!(
            " {} | Updated {:.1}s ago | {}",
            app.feed_description(),
            updated.elapsed().as_secs_f64(),
            controls,
        )
    } else if let Some(ref fault) = app.last_fault {
        format!(" Error: {} | reconnecting automatically | q:quit", fault)
    } else {
        format!(" {} | waiting... | q:quit", app.feed_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch tabs"),
        Line::from("  1/2/3       Jump to a tab"),
        Line::from("  ↑/↓ j/k     Select batch/advisory"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Open trends for batch"),
        Line::from("  Esc         Back to overview"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Trends",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  p           Cycle pH/temp/CO2"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  e           Export batch window CSV"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
