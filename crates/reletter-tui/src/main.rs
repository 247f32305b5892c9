//! Reletter - terminal client for the Reletter letter service.
//!
//! Starts on the login page. A successful login stores the access token and
//! moves on to the main view.

mod app;
mod ui;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use reletter_core::{open_store, submit_login, AuthClient, Config, Field, LoginForm};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE_NAME: &str = "reletter.log";

const USAGE: &str = "\
Usage: reletter [OPTIONS]

Options:
  --login                Log in from the command line without the TUI
  --set-api-url <URL>    Save the API base URL to the config file
  -h, --help             Print this help

Environment:
  RELETTER_API_URL       API base URL (overrides the config file)
  RUST_LOG               Log filter (default: warn)";

/// Command selected on the command line
#[derive(Debug)]
enum Command {
    Tui,
    Login,
    SetApiUrl(String),
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [] => Ok(Command::Tui),
        [flag] if flag == "--help" || flag == "-h" => Ok(Command::Help),
        [flag] if flag == "--login" => Ok(Command::Login),
        [flag, url] if flag == "--set-api-url" => Ok(Command::SetApiUrl(url.clone())),
        [flag] if flag == "--set-api-url" => bail!("--set-api-url requires a URL\n\n{}", USAGE),
        [flag, _, extra, ..] if flag == "--set-api-url" => {
            bail!("Unexpected argument after {}: {}\n\n{}", flag, extra, USAGE)
        }
        [flag, extra, ..] if is_known_flag(flag) => {
            bail!("Unexpected argument after {}: {}\n\n{}", flag, extra, USAGE)
        }
        [other, ..] => bail!("Unknown argument: {}\n\n{}", other, USAGE),
    }
}

fn is_known_flag(arg: &str) -> bool {
    matches!(arg, "--login" | "--help" | "-h" | "--set-api-url")
}

/// Initialize logging to a file, since stderr belongs to the terminal UI.
/// The returned guard flushes the log on drop.
fn init_file_tracing(config: &Config) -> Result<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = config.log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

/// Initialize logging to stderr for the non-interactive commands
fn init_stderr_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::SetApiUrl(url) => {
            init_stderr_tracing();
            set_api_url(url)
        }
        Command::Login => {
            init_stderr_tracing();
            login_from_cli().await
        }
        Command::Tui => run_tui().await,
    }
}

async fn run_tui() -> Result<()> {
    let config = Config::load()?;
    let _guard = init_file_tracing(&config)?;
    info!("Reletter starting");

    // Build services before touching the terminal so config errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
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

    info!("Reletter shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

/// Save the API base URL so later runs don't need the environment variable
fn set_api_url(url: String) -> Result<()> {
    let url = url.trim().to_string();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("API URL must start with http:// or https://: {}", url);
    }

    let mut config = Config::load()?;
    config.api_url = Some(url);
    config.save()?;

    info!(api_url = ?config.api_url, "API URL saved");
    eprintln!("API URL saved.");
    Ok(())
}

/// Log in without the TUI, prompting on the terminal
async fn login_from_cli() -> Result<()> {
    let config = Config::load()?;
    let api = AuthClient::new(&config.resolve_api_url()?)?;
    let store = open_store(&config)?;

    eprint!("Email: ");
    io::stderr().flush()?;
    let mut email = String::new();
    io::stdin()
        .lock()
        .read_line(&mut email)
        .context("Failed to read email")?;

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let mut form = LoginForm::new();
    form.set_email(email.trim());
    form.set_password(password);
    form.touch_all();

    let Some(credentials) = form.credentials() else {
        for field in [Field::Email, Field::Password] {
            if let Some(error) = form.error(field) {
                eprintln!("{}: {}", field.name(), error);
            }
        }
        bail!("Invalid login form");
    };

    info!(url = %api.login_url(), "Logging in");
    let outcome = submit_login(&api, store.as_ref(), &credentials).await;
    eprintln!("{}", outcome.notice());

    if !outcome.is_success() {
        bail!("Login failed");
    }
    Ok(())
}
