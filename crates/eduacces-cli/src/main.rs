//! `eduacces`: terminal dashboard for the Eduacces attendance backend.
//!
//! # Usage
//!
//! ```
//! eduacces login admin@example.com
//! eduacces --url http://localhost:3000
//! eduacces --config ~/.config/eduacces/config.toml
//! eduacces logout
//! ```

#![allow(async_fn_in_trait)]

mod app;
mod config;
mod features;
mod form;
mod notice;
mod picker;
mod sensor;
mod table;
mod ui;

use std::{
  fs::OpenOptions,
  io::{self, Write},
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::{Duration, Instant},
};

use anyhow::{Context, Result};
use app::{App, AppEvent};
use clap::{Parser, Subcommand};
use config::{ConfigFile, Overrides, Settings};
use crossterm::{
  event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eduacces_client::{ApiClient, ApiConfig, SessionStore};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "eduacces", about = "Terminal dashboard for the Eduacces attendance system")]
struct Args {
  /// Path to a TOML config file (url, session_path, page_size).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the Eduacces backend (default: http://localhost:3000).
  #[arg(long, env = "EDUACCES_URL", global = true)]
  url: Option<String>,

  /// Where the login session is stored.
  #[arg(long, value_name = "FILE", env = "EDUACCES_SESSION", global = true)]
  session: Option<PathBuf>,

  /// Where the dashboard writes its log.
  #[arg(long, value_name = "FILE", global = true)]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Log in and store the session.
  Login {
    email: String,

    /// Prompted for when omitted.
    #[arg(long, env = "EDUACCES_PASSWORD", hide_env_values = true)]
    password: Option<String>,
  },
  /// Log out and forget the stored session.
  Logout,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg = match &args.config {
    Some(path) => ConfigFile::load(path)?,
    None => ConfigFile::default(),
  };
  let settings = Settings::resolve(
    Overrides { url: args.url, session: args.session, log_file: args.log_file },
    file_cfg,
  )?;

  match args.command {
    None => init_file_tracing(&settings.log_file)?,
    Some(_) => init_stderr_tracing(),
  }

  let session = Arc::new(
    SessionStore::open(&settings.session_path)
      .with_context(|| format!("opening session file {}", settings.session_path.display()))?,
  );
  let config = ApiConfig { base_url: settings.base_url.clone() };
  let api = ApiClient::with_session(config, session.clone()).context("building API client")?;

  match args.command {
    Some(Command::Login { email, password }) => {
      let password = match password {
        Some(p) => p,
        None => prompt_password()?,
      };
      let session = api.login(&email, &password).await.context("logging in")?;
      println!("logged in as {}", session.user.email);
      Ok(())
    }
    Some(Command::Logout) => {
      api.logout().await.context("logging out")?;
      println!("logged out");
      Ok(())
    }
    None => run_tui(api, session.user(), settings.page_size).await,
  }
}

fn filter() -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy()
}

fn init_stderr_tracing() {
  tracing_subscriber::fmt().with_env_filter(filter()).with_writer(io::stderr).init();
}

fn init_file_tracing(path: &Path) -> Result<()> {
  if let Some(dir) = path.parent() {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("creating log directory {}", dir.display()))?;
  }
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(filter())
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

/// Read a password from the terminal without echoing it.
fn prompt_password() -> Result<String> {
  eprint!("password: ");
  io::stderr().flush().ok();

  enable_raw_mode().context("enabling raw mode")?;
  let read = read_hidden();
  disable_raw_mode().ok();
  eprintln!();
  read
}

fn read_hidden() -> Result<String> {
  let mut password = String::new();
  loop {
    let Event::Key(key) = event::read().context("reading password")? else { continue };
    if key.kind != KeyEventKind::Press {
      continue;
    }
    match key.code {
      KeyCode::Enter => return Ok(password),
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        anyhow::bail!("password entry cancelled")
      }
      KeyCode::Backspace => {
        password.pop();
      }
      KeyCode::Char(c) => password.push(c),
      _ => {}
    }
  }
}

// ─── Terminal UI ──────────────────────────────────────────────────────────────

async fn run_tui(
  api: ApiClient,
  user: Option<eduacces_core::account::SessionUser>,
  page_size: usize,
) -> Result<()> {
  if user.is_none() {
    tracing::warn!("no stored session; requests will be sent without a token");
  }
  let (mut app, mut events) = App::new(api, user, page_size);

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.activate().await;
  let run_result = run_event_loop(&mut terminal, &mut app, &mut events).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
  loop {
    while let Ok(event) = events.try_recv() {
      app.on_event(event).await;
    }
    app.tick(Instant::now());

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key).await? {
          break;
        }
      }
      // Resize and the rest redraw on the next iteration.
      _ => {}
    }
  }

  Ok(())
}
