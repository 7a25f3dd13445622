//! Sojourn - Study Abroad Application Planner
//!
//! A terminal client for the Sojourn planning server.
//!
//! ## Usage
//!
//! ```bash
//! # Start the planner against the default local server
//! sojourn
//!
//! # Point at a remote planner
//! sojourn --server https://planner.example.com
//!
//! # With verbose logging
//! sojourn -v
//! ```

use std::io::Write;
use std::panic;
use std::process::ExitCode;

use clap::Parser;
use sojourn_client::ClientConfig;
use sojourn_core::{init_logging, LogGuard};
use sojourn_tui::App;
use tracing::{error, info};

/// Sojourn Study Abroad Application Planner
///
/// Walks you through your academic profile, streams the planning pipeline's
/// progress, and renders the shortlist with timelines and Q&A.
#[derive(Parser, Debug)]
#[command(name = "sojourn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.sojourn/logs/)
    #[arg(long)]
    log_dir: Option<std::path::PathBuf>,

    /// Planner server base URL (overrides the config file)
    #[arg(long)]
    server: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    // Panic hook restores the terminal so the message stays readable
    install_panic_hook();

    info!("Starting Sojourn planner");

    match run_app(&cli) {
        Ok(()) => {
            info!("Sojourn exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Sojourn error: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic
/// message. Raw mode plus the alternate screen would otherwise eat it.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restore terminal to its normal state.
fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    let _ = crossterm::terminal::disable_raw_mode();
    crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::execute!(stdout, crossterm::cursor::Show)?;
    stdout.flush()?;

    Ok(())
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> sojourn_core::Result<LogGuard> {
    let verbose = cli.verbose > 0;
    init_logging(cli.log_dir.clone(), verbose)
}

/// Load config, apply CLI overrides, and run the TUI.
fn run_app(cli: &Cli) -> sojourn_tui::AppResult<()> {
    let mut config = ClientConfig::load()?;
    if let Some(server) = &cli.server {
        config = config.with_base_url(server.clone());
    }

    let mut app = App::new(config);
    app.run()
}
