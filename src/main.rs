// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
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
use tracing::info;

mod app;
mod config;
mod data;
mod events;
mod logging;
mod source;
mod ui;

use app::{App, View};
use crate::config::DashboardConfig;
use data::DashboardData;
use source::{ActuatorClient, DataSource, FileSource, HttpSource};

#[derive(Parser, Debug)]
#[command(name = "actuator-dash")]
#[command(about = "Terminal dashboard for Spring-style actuator endpoints")]
struct Args {
    /// Actuator base URL (e.g. http://localhost:8080/actuator)
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Read endpoint responses from a snapshot file instead of over HTTP
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval (e.g. "5s", "1m")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Request timeout (e.g. "10s")
    #[arg(short, long)]
    timeout: Option<String>,

    /// Fetch once, export state to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Log file used while the TUI is running
    #[arg(long)]
    log_file: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Command-line flags take precedence over every config layer.
    fn apply_to(&self, config: &mut DashboardConfig) {
        if let Some(ref url) = self.url {
            config.base_url = url.clone();
        }
        if let Some(ref refresh) = self.refresh {
            config.refresh_interval = refresh.clone();
        }
        if let Some(ref timeout) = self.timeout {
            config.request_timeout = timeout.clone();
        }
        if let Some(ref log_file) = self.log_file {
            config.log_file = log_file.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    args.apply_to(&mut config);
    let refresh_interval = config.refresh_interval()?;
    let request_timeout = config.request_timeout()?;

    let runtime = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        logging::init_stderr_logging(args.verbose)?;
        return runtime.block_on(export_to_file(
            args.file.as_deref(),
            &config,
            request_timeout,
            export_path,
        ));
    }

    logging::init_file_logging(Path::new(&config.log_file), args.verbose)?;

    // Lets the UI thread spawn fetches and the uptime ticker
    let _guard = runtime.enter();

    let source: Box<dyn DataSource> = match args.file {
        Some(ref path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpSource::new(build_client(&config, request_timeout)?)),
    };
    info!(source = source.description(), refresh = ?refresh_interval, "starting dashboard");

    run_tui(source, refresh_interval, PathBuf::from(&config.export_path))
}

fn build_client(config: &DashboardConfig, timeout: Duration) -> Result<ActuatorClient> {
    Ok(ActuatorClient::builder()
        .base_url(&config.base_url)
        .timeout(timeout)
        .build()?)
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    refresh_interval: Duration,
    export_path: PathBuf,
) -> Result<()> {
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

    let mut app = App::new(source, ui::Theme::auto_detect()).with_export_path(export_path);
    app.refresh();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("dashboard closed");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Fetch results land between frames
        app.reload_data();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5u16.min(area.height));
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
                View::Traces => ui::traces::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Short timeout keeps the uptime clock moving
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1)
                    events::handle_mouse_event(app, mouse, 2);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.refresh();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Fetch every endpoint once and write the dashboard state to a JSON file
async fn export_to_file(
    snapshot: Option<&Path>,
    config: &DashboardConfig,
    timeout: Duration,
    export_path: &Path,
) -> Result<()> {
    let mut data = DashboardData::new();

    match snapshot {
        Some(path) => {
            let mut source = FileSource::new(path);
            while let Some(update) = source.poll() {
                data.apply(update);
            }
            if let Some(err) = source.error() {
                bail!("{}: {}", path.display(), err);
            }
        }
        None => {
            let client = build_client(config, timeout)?;
            info!(base_url = client.base_url(), "fetching all endpoints");
            for update in client.fetch_all().await {
                data.apply(update);
            }
        }
    }

    data.write_export(export_path)?;
    // The ticker is not needed once the state is on disk
    data.uptime.stop();

    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}
