//! Winter Temperature Tracker - compare meteorological and astronomical winters
//!
//! Serves averaged winter temperatures for a Meteostat station over HTTP and
//! shows them in a terminal viewer.

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use wintertemp::aggregate::Aggregator;
use wintertemp::app::App;
use wintertemp::cli::{default_view_url, Cli, Command, StartupConfig};
use wintertemp::config::Config;
use wintertemp::data::PayloadClient;
use wintertemp::server::{self, AppState};
use wintertemp::ui;

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default filter
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wintertemp=info".into()),
        )
        .with_writer(io::stderr)
        .init();
}

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the viewer panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Runs the terminal viewer until the user quits
async fn run_viewer(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial render to show loading state
    terminal.draw(|f| ui::render(f, &app))?;

    // Trigger initial data load
    app.load().await;

    // Main event loop
    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }

        if app.reload_requested {
            app.load().await;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

/// Aggregates once and prints the payload; exits non-zero on failure
async fn run_report(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let aggregator = Aggregator::from_config(config);
    match aggregator.payload(Local::now().naive_local()).await {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "report failed");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    match cli.command {
        Command::Serve { bind } => {
            init_tracing();
            let addr = bind.unwrap_or(config.bind_addr);
            info!(mode = ?config.mode, station = %config.station, "starting server");
            let state = AppState {
                aggregator: Aggregator::from_config(&config),
            };
            server::serve(state, addr).await?;
        }
        Command::Report => {
            init_tracing();
            run_report(&config).await?;
        }
        Command::View { url, year } => {
            // Validate before touching the terminal
            let startup = match StartupConfig::from_args(year, &config) {
                Ok(startup) => startup,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(2);
                }
            };
            let url = url.unwrap_or_else(|| default_view_url(&config));
            let app = App::new(PayloadClient::new(url), startup);
            run_viewer(app).await?;
        }
    }

    Ok(())
}
