// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod app;
mod data;
mod dispatch;
mod events;
mod feed;
mod settings;
mod ui;

use app::{App, View};
use feed::{DemoFeed, Feed, ReplayFeed, SocketFeed};
use settings::{Settings, ThemeChoice};

#[derive(Parser, Debug)]
#[command(name = "fermwatch")]
#[command(about = "Terminal dashboard for live fermentation quality tracking")]
struct Args {
    /// Stream endpoint (host:port); overrides the configured endpoint
    #[arg(short, long, conflicts_with_all = ["demo", "replay"])]
    connect: Option<String>,

    /// Run against the built-in synthetic batches (no server needed)
    #[arg(short, long, conflicts_with_all = ["connect", "replay"])]
    demo: bool,

    /// Replay a captured frame file (newline-delimited JSON)
    #[arg(short, long, conflicts_with_all = ["connect", "demo"])]
    replay: Option<PathBuf>,

    /// Settings file (TOML); defaults to ./fermwatch.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fermentation units to track
    #[arg(short, long)]
    units: Option<u32>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Append tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Layer CLI flags over file/env settings
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(endpoint) = args.connect.clone() {
        settings.endpoint = endpoint;
    }
    if let Some(units) = args.units {
        settings.units = units;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    if let Some(log_file) = args.log_file.clone() {
        settings.log_file = Some(log_file);
    }

    init_tracing(settings.log_file.as_deref())?;

    // Feeds run on a background tokio runtime; the TUI owns the main
    // thread. Entering the runtime lets the feed constructors spawn.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let feed: Box<dyn Feed> = if args.demo {
        Box::new(DemoFeed::spawn(Duration::from_millis(600)))
    } else if let Some(ref path) = args.replay {
        Box::new(ReplayFeed::spawn(
            path,
            Duration::from_millis(settings.replay_cadence_ms),
        ))
    } else {
        Box::new(SocketFeed::spawn(&settings.endpoint))
    };

    run_tui(feed, &settings)
}

/// Send tracing output to the configured file. Logging stays off without
/// one; stderr belongs to the terminal UI.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("could not install tracing subscriber")?;
    Ok(())
}

/// Run the TUI over the given feed
fn run_tui(feed: Box<dyn Feed>, settings: &Settings) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(feed, settings);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Drain whatever the feed produced since the last frame
        app.pump_feed();

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[2]),
                View::Trends => ui::trends::render(frame, app, chunks[2]),
                View::Advisories => ui::advisories::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout; this also paces redraws
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
