use anyhow::Result;
use rand::Rng;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::catalog::{CatalogSource, Tab, VideoRecord};
use crate::config::Config;
use crate::filter::{EmptyState, empty_state, visible_indices};
use crate::roster::Roster;
use crate::theme::{self, THEMES, Theme};

// --- Types ---

pub type LoadResult = Result<Vec<VideoRecord>>;

/// Shown instead of the catalog when it can't be built at all.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load videos. Please try again later.";

pub struct App {
  pub academy_name: String,
  pub tagline: String,
  /// Free-text search over titles.
  pub query: String,
  /// Cursor position within the query (char index).
  pub cursor_position: usize,
  /// Horizontal scroll offset for the query input.
  pub query_scroll: usize,
  pub tab: Tab,
  pub theme_index: usize,
  /// The loaded catalog. Empty until the load completes.
  pub videos: Vec<VideoRecord>,
  /// Indices into `videos` that pass the current tab and query.
  pub visible: Vec<usize>,
  pub list_state: ListState,
  pub loading: bool,
  /// Set when the catalog load failed outright.
  pub load_error: Option<String>,
  pub last_error: Option<String>,
  /// Informational message, lower priority than errors.
  pub info_message: Option<String>,
  pub should_quit: bool,
  /// App start instant, drives the loading spinner.
  pub started_at: Instant,
  load_rx: Option<oneshot::Receiver<LoadResult>>,
  /// When the last error was set, for auto-dismiss after 5 seconds.
  error_time: Option<Instant>,
  config: Config,
}

impl App {
  pub fn new(config: Config, roster: &Roster, tab: Tab, query: String) -> Self {
    let theme_index = config.theme_name.as_deref().map_or(0, theme::index_of);
    let cursor_position = query.chars().count();

    Self {
      academy_name: roster.academy_name.clone(),
      tagline: roster.tagline.clone(),
      query,
      cursor_position,
      query_scroll: 0,
      tab,
      theme_index,
      videos: Vec::new(),
      visible: Vec::new(),
      list_state: ListState::default(),
      loading: false,
      load_error: None,
      last_error: None,
      info_message: None,
      should_quit: false,
      started_at: Instant::now(),
      load_rx: None,
      error_time: None,
      config,
    }
  }

  pub fn theme(&self) -> &'static Theme {
    // Safety: theme_index is bounded by index_of() and the modular arithmetic in next_theme().
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.config.theme_name = Some(self.theme().name.to_string());
    self.config.save();
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after 5 seconds.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(5)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  // --- Catalog loading ---

  /// Spawn the one-time catalog load. The result is picked up by `check_pending`.
  pub fn start_load<R>(&mut self, mut source: CatalogSource<R>)
  where
    R: Rng + Send + 'static,
  {
    self.loading = true;
    self.load_error = None;

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(source.load().await);
    });
    self.load_rx = Some(rx);
  }

  /// Poll the in-flight load without blocking the UI loop.
  pub fn check_pending(&mut self) {
    let Some(mut rx) = self.load_rx.take() else { return };
    match rx.try_recv() {
      Ok(result) => self.apply_catalog(result),
      Err(oneshot::error::TryRecvError::Empty) => {
        self.load_rx = Some(rx);
      }
      Err(oneshot::error::TryRecvError::Closed) => {
        self.apply_catalog(Err(anyhow::anyhow!("Catalog load task ended without a result")));
      }
    }
  }

  /// Install a finished load. A failed load leaves an empty catalog behind.
  pub fn apply_catalog(&mut self, result: LoadResult) {
    self.loading = false;
    match result {
      Ok(videos) => {
        info!(count = videos.len(), "catalog ready");
        self.videos = videos;
        self.load_error = None;
      }
      Err(e) => {
        error!(err = %format!("{:#}", e), "catalog load failed");
        self.videos.clear();
        self.load_error = Some(LOAD_ERROR_MESSAGE.to_string());
      }
    }
    self.list_state.select(None);
    self.recompute_visible();
  }

  // --- Filtering ---

  /// Rebuild `visible` from the catalog, tab and query.
  /// Clamps the list selection to stay within the visible range.
  pub fn recompute_visible(&mut self) {
    self.visible = visible_indices(&self.videos, self.tab, &self.query);
    if self.visible.is_empty() {
      self.list_state.select(None);
    } else {
      let sel = self.list_state.selected().unwrap_or(0);
      self.list_state.select(Some(sel.min(self.visible.len() - 1)));
    }
  }

  pub fn set_tab(&mut self, tab: Tab) {
    if self.tab != tab {
      self.tab = tab;
      self.info_message = None;
      self.list_state.select(None);
      self.recompute_visible();
    }
  }

  pub fn empty_state(&self) -> Option<EmptyState> {
    if self.loading {
      return None;
    }
    empty_state(self.visible.len(), self.tab, &self.query)
  }

  // --- Selection ---

  pub fn select_next(&mut self) {
    self.info_message = None;
    let count = self.visible.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
      self.list_state.select(Some(i));
    }
  }

  pub fn select_prev(&mut self) {
    self.info_message = None;
    let count = self.visible.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.list_state.select(Some(i));
    }
  }

  pub fn selected_video(&self) -> Option<&VideoRecord> {
    let selected = self.list_state.selected()?;
    let &idx = self.visible.get(selected)?;
    self.videos.get(idx)
  }

  /// Open the selected video in the system browser. Fire-and-forget.
  pub fn open_selected(&mut self) {
    let Some(video) = self.selected_video() else { return };
    let url = video.url.clone();
    let title = video.title.clone();

    match webbrowser::open(&url) {
      Ok(()) => {
        info!(url = %url, "opened video in browser");
        self.clear_error();
        self.info_message = Some(format!("Opened \"{}\" in your browser", title));
      }
      Err(e) => {
        warn!(url = %url, err = %e, "failed to open browser");
        self.set_error(format!("Failed to open browser: {}", e));
      }
    }
  }
}
