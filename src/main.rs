use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

use sync_doctor::app::App;
use sync_doctor::data::{Group, Snapshot};
use sync_doctor::poll::Poller;
use sync_doctor::source::{FileSource, HttpSource, StatusSource};
use sync_doctor::{events, ui};

#[derive(Parser, Debug)]
#[command(name = "sync-doctor")]
#[command(about = "Diagnostic TUI for monitoring background data-sync workers")]
struct Args {
    /// Status endpoint URL (e.g. http://localhost:3000/workers/status)
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Path to a status report JSON file (used when no --url is given)
    #[arg(short, long, default_value = "status.json")]
    file: PathBuf,

    /// Poll interval in seconds
    #[arg(short, long, default_value = "4")]
    interval: u64,

    /// Path to a JSON group schema replacing the built-in groups
    #[arg(short, long)]
    groups: Option<PathBuf>,

    /// Fetch once, print the computed snapshot as JSON, and exit
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let groups = match args.groups {
        Some(ref path) => load_groups(path)?,
        None => Group::defaults(),
    };

    let source: Arc<dyn StatusSource> = match args.url {
        Some(ref url) => Arc::new(HttpSource::new(url.clone())),
        None => Arc::new(FileSource::new(&args.file)),
    };

    let rt = tokio::runtime::Runtime::new()?;

    // Handle one-shot mode (non-interactive)
    if args.once {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
        return rt.block_on(print_once(source, &groups));
    }

    let _guard = rt.enter();

    let description = source.description().to_string();
    let mut poller = Poller::with_interval(
        Arc::clone(&source),
        groups.clone(),
        Duration::from_secs(args.interval.max(1)),
    );
    let receiver = poller.subscribe();

    // One-shot fetch while still idle, so the header has something to show
    // the moment the screen appears.
    rt.block_on(poller.refresh_once());

    let mut app = App::new(groups, receiver, description);

    run_tui(&mut app, &mut poller, &rt)
}

/// Load a group schema from a JSON file.
fn load_groups(path: &Path) -> Result<Vec<Group>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read group schema {}", path.display()))?;
    let groups: Vec<Group> = serde_json::from_str(&content)
        .with_context(|| format!("invalid group schema {}", path.display()))?;
    if groups.is_empty() {
        anyhow::bail!("group schema {} defines no groups", path.display());
    }
    Ok(groups)
}

/// Fetch one report and print the computed snapshot to stdout.
///
/// A failed fetch prints the error snapshot the TUI would have shown; the
/// `error` field tells scripts what went wrong.
async fn print_once(source: Arc<dyn StatusSource>, groups: &[Group]) -> Result<()> {
    let snapshot = match source.fetch().await {
        Ok(report) => Snapshot::from_report(&report, groups),
        Err(err) => Snapshot::from_fetch_error(err.to_string()),
    };

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Run the TUI around the given poller.
fn run_tui(app: &mut App, poller: &mut Poller, rt: &tokio::runtime::Runtime) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Run the main loop
    let result = run_app(&mut terminal, app, poller, rt);

    // Stop polling before the screen goes away
    poller.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poller: &mut Poller,
    rt: &tokio::runtime::Runtime,
) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 10;

    while app.running {
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
                let y = (area.height / 2).saturating_sub(2);
                let centered =
                    ratatui::layout::Rect::new(0, y, area.width, 5.min(area.height - y));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(6),    // Group table
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::summary::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Drain snapshots published since the last iteration
        app.apply_updates();

        // Reconcile the poller with the operator's pause intent. Both calls
        // are idempotent, so flapping here is safe.
        if app.paused && poller.is_polling() {
            poller.stop();
        } else if !app.paused && !poller.is_polling() {
            poller.start();
        }

        // One-shot refresh only makes sense while idle; live mode is
        // already fetching on its own.
        if app.refresh_requested {
            app.refresh_requested = false;
            if poller.is_polling() {
                app.set_status_message("Already live".to_string());
            } else {
                rt.block_on(poller.refresh_once());
                app.set_status_message("Refreshed".to_string());
            }
        }
    }

    Ok(())
}
