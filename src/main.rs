mod app;
mod catalog;
mod config;
mod filter;
mod input;
mod roster;
mod theme;
mod ui;
mod youtube;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use catalog::{CatalogConfig, CatalogSource, Tab, VideoRecord};
use config::{API_KEY_ENV, Config};
use roster::Roster;

/// Environment variable holding the log filter, e.g. `VIDCAT_LOG=debug`.
const LOG_ENV: &str = "VIDCAT_LOG";

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// YouTube Data API key (overrides $YOUTUBE_API_KEY and prefs.toml)
  #[arg(long)]
  api_key: Option<String>,

  /// Load the roster from a RON file instead of the built-in one
  #[arg(long, value_name = "PATH")]
  roster: Option<PathBuf>,

  /// Print the catalog and exit instead of starting the interface
  #[arg(short, long)]
  list: bool,

  /// Category tab to show
  #[arg(short, long, value_enum, default_value_t = Tab::All)]
  tab: Tab,

  /// Title search applied on top of the tab
  #[arg(short, long, default_value = "")]
  query: String,

  /// With --list, print records as JSON
  #[arg(long, requires = "list")]
  json: bool,

  /// Seed for placeholder metadata (random when omitted)
  #[arg(long)]
  seed: Option<u64>,

  /// Print shell completions and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Logging ---

/// Send logs to a file in the cache dir so the interface keeps the terminal.
fn init_logging() -> Result<WorkerGuard> {
  let dir = config::log_dir();
  std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;
  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, "vidcat.log"));

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Ok(guard)
}

// --- Setup ---

fn build_source(args: &Args, config: &Config, roster: Roster) -> CatalogSource<StdRng> {
  let env_key = std::env::var(API_KEY_ENV).ok();
  let api_key = config.resolve_api_key(args.api_key.as_deref(), env_key.as_deref());

  let mut roster = roster;
  if let Some(base) = &config.api_base_url {
    roster.api_base_url = base.clone();
  }

  let rng = match args.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_os_rng(),
  };
  CatalogSource::new(CatalogConfig { roster, api_key }, reqwest::Client::new(), rng)
}

fn load_roster(args: &Args) -> Result<Roster> {
  match &args.roster {
    Some(path) => Roster::from_file(path),
    None => Ok(Roster::builtin().clone()),
  }
}

// --- List mode ---

fn write_listing(out: &mut impl Write, videos: &[&VideoRecord], json: bool) -> Result<()> {
  if json {
    serde_json::to_writer_pretty(&mut *out, videos).context("Failed to serialize catalog")?;
    writeln!(out)?;
    return Ok(());
  }
  for video in videos {
    writeln!(
      out,
      "{:<13} {:>8}  {:>9}  {}  {}",
      video.category.label(),
      video.duration,
      ui::format_views(video.views),
      ui::format_date(&video.published_at),
      video.title
    )?;
    writeln!(out, "{:<13} {}", "", video.url)?;
  }
  Ok(())
}

async fn run_list(args: &Args, mut source: CatalogSource<StdRng>) -> Result<()> {
  info!(academy = %source.roster().academy_name, "list: loading catalog");
  let videos = source.load().await.context("Failed to load videos")?;
  let shown = filter::visible(&videos, args.tab, &args.query);
  info!(shown = shown.len(), total = videos.len(), "list: printing catalog");

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  write_listing(&mut out, &shown, args.json)?;

  if let Some(state) = filter::empty_state(shown.len(), args.tab, &args.query) {
    eprintln!("{}", state.message());
  }
  Ok(())
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "vidcat", &mut std::io::stdout());
    return Ok(());
  }

  let _guard = init_logging()?;
  let config = Config::load();
  let roster = load_roster(&args)?;
  info!(videos = roster.videos.len(), list = args.list, "vidcat starting");

  if args.list {
    let source = build_source(&args, &config, roster);
    return run_list(&args, source).await;
  }

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut app = App::new(config.clone(), &roster, args.tab, args.query.clone());
  app.start_load(build_source(&args, &config, roster));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, &mut app);
  ratatui::restore();
  result
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, app)).context("Failed to draw frame")?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  info!("vidcat exiting");
  Ok(())
}
