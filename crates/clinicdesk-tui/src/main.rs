//! clinicdesk - terminal admin console for the clinic appointment platform.
//!
//! Shows the doctor directory for a logged-in admin. Besides the
//! interactive UI there are a few one-shot commands:
//!
//! - `--login`: prompt for credentials and store the admin token
//! - `--list`: print the doctor directory as JSON
//! - `--logout`: forget the stored token

mod app;
mod ui;
mod utils;

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clinicdesk_core::{AdminApiClient, AdminContext, Config, FileStorage};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "clinicdesk.log";

/// Initialize the tracing subscriber.
///
/// The terminal belongs to the UI, so logs go to a daily-rotated file.
/// Use RUST_LOG to control the level (e.g., RUST_LOG=debug).
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config_path = Config::default_path()?;
    let config = Config::load_from(&config_path)?;

    let log_dir = config.cache_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let _log_guard = init_tracing(&log_dir);

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--login") => return login_command(config, &config_path).await,
        Some("--list") => return list_command(&config).await,
        Some("--logout") => return logout_command(&config),
        Some(other) => {
            anyhow::bail!("Unknown argument: {} (expected --login, --list or --logout)", other)
        }
        None => {}
    }

    info!("clinicdesk starting");

    // Build the app before touching the terminal so config errors print normally
    let mut app = App::new(config, config_path)?;
    if !app.is_authenticated() {
        app.start_login();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("clinicdesk shutting down");
    Ok(())
}

fn build_context(config: &Config) -> Result<AdminContext<FileStorage>> {
    let api = AdminApiClient::new(config.backend_url()?)?;
    let storage = FileStorage::new(&config.data_dir()?);
    Ok(AdminContext::new(api, storage))
}

/// Prompt for credentials on the terminal and store the resulting token
async fn login_command(mut config: Config, config_path: &Path) -> Result<()> {
    let mut ctx = build_context(&config)?;

    let email = match config.last_email {
        Some(ref last) => {
            eprint!("Email [{}]: ", last);
            io::stderr().flush()?;
            let input = read_line()?;
            if input.is_empty() {
                last.clone()
            } else {
                input
            }
        }
        None => {
            eprint!("Email: ");
            io::stderr().flush()?;
            read_line()?
        }
    };
    let password = rpassword::prompt_password("Password: ")?;

    ctx.login(&email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Login failed: {}", e.toast_message()))?;

    config.last_email = Some(email);
    config.save_to(config_path)?;

    eprintln!("Logged in. Token stored.");
    Ok(())
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Fetch the doctor directory once and print it as JSON
async fn list_command(config: &Config) -> Result<()> {
    let mut ctx = build_context(config)?;

    ctx.get_all_doctors()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.toast_message()))?;

    let json = serde_json::to_string_pretty(ctx.doctors())?;
    println!("{}", json);

    eprintln!("{} doctors", ctx.doctors().len());
    Ok(())
}

fn logout_command(config: &Config) -> Result<()> {
    let mut ctx = build_context(config)?;
    ctx.logout();
    eprintln!("Logged out.");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Fetch on token change, expire toasts
        app.tick();

        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
