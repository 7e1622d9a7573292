use std::cmp::Ordering;
use std::time::{Duration, Instant};

use ratatui::widgets::TableState;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::constants::constants;
use crate::export;
use crate::options::{DurationBucket, OptionsError, SearchOptions, VIEW_THRESHOLDS};
use crate::pipeline::{self, ResultRow};
use crate::theme::{THEMES, Theme};
use crate::youtube::{ApiClient, ApiError};

// --- Types ---

pub type SearchOutcome = Result<Vec<ResultRow>, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Query,
  Filters,
  Results,
}

/// Sortable result-table columns, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  Views,
  Likes,
  Comments,
  Duration,
  Published,
  Title,
  Channel,
  Kind,
}

impl SortKey {
  pub const ALL: [SortKey; 8] = [
    SortKey::Views,
    SortKey::Likes,
    SortKey::Comments,
    SortKey::Duration,
    SortKey::Published,
    SortKey::Title,
    SortKey::Channel,
    SortKey::Kind,
  ];

  pub fn label(self) -> &'static str {
    match self {
      SortKey::Views => "views",
      SortKey::Likes => "likes",
      SortKey::Comments => "comments",
      SortKey::Duration => "duration",
      SortKey::Published => "published",
      SortKey::Title => "title",
      SortKey::Channel => "channel",
      SortKey::Kind => "type",
    }
  }

  /// Typed comparator for this column. Absent counts compare as zero so
  /// playlist/channel rows group below videos on numeric sorts.
  pub fn compare(self, a: &ResultRow, b: &ResultRow) -> Ordering {
    match self {
      SortKey::Views => a.views.unwrap_or(0).cmp(&b.views.unwrap_or(0)),
      SortKey::Likes => a.likes.unwrap_or(0).cmp(&b.likes.unwrap_or(0)),
      SortKey::Comments => a.comments.unwrap_or(0).cmp(&b.comments.unwrap_or(0)),
      SortKey::Duration => a.duration_secs.unwrap_or(0).cmp(&b.duration_secs.unwrap_or(0)),
      // ISO YYYY-MM-DD strings order correctly as text; empties sort first.
      SortKey::Published => a.published.cmp(&b.published),
      SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
      SortKey::Channel => a.channel.to_lowercase().cmp(&b.channel.to_lowercase()),
      SortKey::Kind => a.category.label().cmp(b.category.label()),
    }
  }
}

/// Rows of the filter panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
  Videos,
  Playlists,
  Channels,
  MinViews,
  Duration,
  After,
  Before,
  Pages,
}

impl FilterField {
  pub const ALL: [FilterField; 8] = [
    FilterField::Videos,
    FilterField::Playlists,
    FilterField::Channels,
    FilterField::MinViews,
    FilterField::Duration,
    FilterField::After,
    FilterField::Before,
    FilterField::Pages,
  ];

  pub fn label(self) -> &'static str {
    match self {
      FilterField::Videos => "Videos",
      FilterField::Playlists => "Playlists",
      FilterField::Channels => "Channels",
      FilterField::MinViews => "Min views",
      FilterField::Duration => "Duration",
      FilterField::After => "Published after",
      FilterField::Before => "Published before",
      FilterField::Pages => "Pages per type",
    }
  }

  /// Date fields take typed input instead of cycling.
  pub fn is_date(self) -> bool {
    matches!(self, FilterField::After | FilterField::Before)
  }
}

/// Raw facet state as edited in the filter panel. Validated into
/// `SearchOptions` only when a search is triggered; until then anything can
/// be half-typed.
pub struct SearchForm {
  pub include_videos: bool,
  pub include_playlists: bool,
  pub include_channels: bool,
  /// Index into [`VIEW_THRESHOLDS`].
  pub views_idx: usize,
  /// Index into [`DurationBucket::ALL`].
  pub duration_idx: usize,
  pub after: String,
  pub before: String,
  pub pages: u32,
  /// Selected row in the filter panel.
  pub selected: usize,
}

impl Default for SearchForm {
  fn default() -> Self {
    Self {
      include_videos: true,
      include_playlists: false,
      include_channels: false,
      views_idx: 0,
      duration_idx: 0,
      after: String::new(),
      before: String::new(),
      pages: constants().default_pages,
      selected: 0,
    }
  }
}

impl SearchForm {
  pub fn min_views(&self) -> u64 {
    VIEW_THRESHOLDS[self.views_idx].1
  }

  pub fn min_views_label(&self) -> &'static str {
    VIEW_THRESHOLDS[self.views_idx].0
  }

  pub fn duration(&self) -> DurationBucket {
    DurationBucket::ALL[self.duration_idx]
  }

  /// Validate the form plus the query into pipeline options.
  pub fn to_options(&self, query: &str) -> Result<SearchOptions, OptionsError> {
    let after = Some(self.after.trim()).filter(|s| !s.is_empty());
    let before = Some(self.before.trim()).filter(|s| !s.is_empty());
    SearchOptions::new(
      query,
      [self.include_videos, self.include_playlists, self.include_channels],
      self.min_views(),
      self.duration(),
      after,
      before,
      self.pages,
    )
  }

  /// Current display value for a filter panel row.
  pub fn field_value(&self, field: FilterField) -> String {
    match field {
      FilterField::Videos => checkbox(self.include_videos),
      FilterField::Playlists => checkbox(self.include_playlists),
      FilterField::Channels => checkbox(self.include_channels),
      FilterField::MinViews => self.min_views_label().to_string(),
      FilterField::Duration => self.duration().label().to_string(),
      FilterField::After => if self.after.is_empty() { "—".to_string() } else { self.after.clone() },
      FilterField::Before => if self.before.is_empty() { "—".to_string() } else { self.before.clone() },
      FilterField::Pages => self.pages.to_string(),
    }
  }

  /// Toggle or cycle a non-date field; `forward` picks the direction for
  /// the enumerated ones.
  pub fn adjust(&mut self, field: FilterField, forward: bool) {
    match field {
      FilterField::Videos => self.include_videos = !self.include_videos,
      FilterField::Playlists => self.include_playlists = !self.include_playlists,
      FilterField::Channels => self.include_channels = !self.include_channels,
      FilterField::MinViews => self.views_idx = cycle(self.views_idx, VIEW_THRESHOLDS.len(), forward),
      FilterField::Duration => self.duration_idx = cycle(self.duration_idx, DurationBucket::ALL.len(), forward),
      FilterField::After | FilterField::Before => {}
      FilterField::Pages => {
        let c = constants();
        self.pages =
          if forward { (self.pages + 1).min(c.max_pages) } else { self.pages.saturating_sub(1).max(c.min_pages) };
      }
    }
  }

  /// Mutable access to the date buffer for the selected row, if it is one.
  pub fn date_buffer_mut(&mut self) -> Option<&mut String> {
    match FilterField::ALL[self.selected] {
      FilterField::After => Some(&mut self.after),
      FilterField::Before => Some(&mut self.before),
      _ => None,
    }
  }
}

fn checkbox(on: bool) -> String {
  if on { "[x]".to_string() } else { "[ ]".to_string() }
}

fn cycle(idx: usize, len: usize, forward: bool) -> usize {
  if forward { (idx + 1) % len } else { (idx + len - 1) % len }
}

/// In-flight async task receivers.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) search_rx: Option<oneshot::Receiver<SearchOutcome>>,
}

// --- App State ---

pub struct App {
  pub input: String,
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub mode: AppMode,
  pub theme_index: usize,
  pub form: SearchForm,
  pub rows: Vec<ResultRow>,
  pub table_state: TableState,
  pub sort_key: SortKey,
  pub sort_desc: bool,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  /// One-line recap of the last completed search, shown when idle.
  pub summary: Option<String>,
  pub should_quit: bool,
  pub(crate) tasks: AsyncTasks,
  api_key: Option<String>,
  last_options: Option<SearchOptions>,
  search_started: Option<Instant>,
  /// When the last error was set — used for auto-dismiss after 5 seconds.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(api_key_flag: Option<String>) -> Self {
    let config = Config::load();
    let theme_index = config
      .theme_name
      .as_ref()
      .and_then(|name| THEMES.iter().position(|t| t.name == name))
      .unwrap_or(0);
    let env_key = std::env::var("YT_API_KEY").ok();
    let api_key = config::resolve_api_key(api_key_flag.as_deref(), env_key.as_deref(), config.api_key.as_deref());

    Self {
      input: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      mode: AppMode::Query,
      theme_index,
      form: SearchForm::default(),
      rows: Vec::new(),
      table_state: TableState::default(),
      sort_key: SortKey::Views,
      sort_desc: true,
      last_error: None,
      status_message: None,
      summary: None,
      should_quit: false,
      tasks: AsyncTasks::default(),
      api_key,
      last_options: None,
      search_started: None,
      error_time: None,
    }
  }

  pub fn theme(&self) -> &'static Theme {
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    let mut config = Config::load();
    config.theme_name = Some(self.theme().name.to_string());
    config.save();
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

  /// True while a pipeline run is in flight. At most one run exists at a
  /// time; new searches are refused until the receiver slot frees up.
  pub fn search_in_flight(&self) -> bool {
    self.tasks.search_rx.is_some()
  }

  // --- Search ---

  pub fn trigger_search(&mut self) {
    if self.search_in_flight() {
      self.status_message = Some("A search is already running…".to_string());
      return;
    }
    let opts = match self.form.to_options(&self.input) {
      Ok(opts) => opts,
      Err(e) => {
        self.set_error(e.to_string());
        return;
      }
    };
    let Some(key) = self.api_key.clone() else {
      self.set_error("Missing API key. Set YT_API_KEY, pass --api-key, or add api_key to prefs.toml.".to_string());
      return;
    };
    let client = match ApiClient::new(key) {
      Ok(client) => client,
      Err(e) => {
        self.set_error(format!("Could not build HTTP client: {}", e));
        return;
      }
    };

    self.clear_error();
    self.status_message = Some(format!("Searching '{}'…", opts.query));
    self.search_started = Some(Instant::now());
    self.last_options = Some(opts.clone());
    info!(query = %opts.query, pages = opts.max_pages_per_type, "search: starting pipeline run");

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(pipeline::run(&client, &opts).await);
    });
    self.tasks.search_rx = Some(rx);
  }

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.search_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(rows) if rows.is_empty() => {
              // A fresh search replaces the table even when it comes back empty.
              self.rows.clear();
              self.table_state.select(None);
              self.summary = None;
              self.set_error(
                "No results matched your filters. Try lowering min views or changing duration/date.".to_string(),
              );
            }
            Ok(rows) => {
              self.rows = rows;
              // The pipeline already orders by views desc; keep the sort
              // state in agreement for the header indicator.
              self.sort_key = SortKey::Views;
              self.sort_desc = true;
              self.table_state.select(Some(0));
              self.mode = AppMode::Results;
              self.summary = Some(self.build_summary());
            }
            Err(e) => {
              warn!(err = %e, "search: pipeline run failed");
              let msg = e.user_hint().map(str::to_string).unwrap_or_else(|| format!("Search failed: {}", e));
              self.summary = None;
              self.set_error(msg);
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.search_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Search task failed.".to_string());
        }
      }
    }
  }

  fn build_summary(&self) -> String {
    let elapsed = self.search_started.map_or(0.0, |t| t.elapsed().as_secs_f64());
    match &self.last_options {
      Some(opts) => format!(
        "Query='{}' | Min views={} | Duration={} | After={} | Before={} | Pages={} | Rows={} | Elapsed: {:.2}s",
        opts.query,
        self.form.min_views_label(),
        opts.duration.label(),
        opts.published_after.map_or("—".to_string(), |d| d.to_string()),
        opts.published_before.map_or("—".to_string(), |d| d.to_string()),
        opts.max_pages_per_type,
        self.rows.len(),
        elapsed,
      ),
      None => format!("Rows={} | Elapsed: {:.2}s", self.rows.len(), elapsed),
    }
  }

  // --- Sorting ---

  pub fn apply_sort(&mut self) {
    let key = self.sort_key;
    let desc = self.sort_desc;
    self.rows.sort_by(|a, b| {
      let ord = key.compare(a, b);
      if desc { ord.reverse() } else { ord }
    });
    if !self.rows.is_empty() {
      self.table_state.select(Some(0));
    }
  }

  pub fn cycle_sort(&mut self) {
    let idx = SortKey::ALL.iter().position(|k| *k == self.sort_key).unwrap_or(0);
    self.sort_key = SortKey::ALL[(idx + 1) % SortKey::ALL.len()];
    // Numeric columns read best descending first; text ascending.
    self.sort_desc = matches!(
      self.sort_key,
      SortKey::Views | SortKey::Likes | SortKey::Comments | SortKey::Duration | SortKey::Published
    );
    self.apply_sort();
  }

  pub fn toggle_sort_direction(&mut self) {
    self.sort_desc = !self.sort_desc;
    self.apply_sort();
  }

  // --- Selection & actions ---

  pub fn selected_row(&self) -> Option<&ResultRow> {
    self.table_state.selected().and_then(|i| self.rows.get(i))
  }

  pub fn select_next(&mut self) {
    let count = self.rows.len();
    if count > 0 {
      let i = self.table_state.selected().map_or(0, |i| (i + 1) % count);
      self.table_state.select(Some(i));
    }
  }

  pub fn select_prev(&mut self) {
    let count = self.rows.len();
    if count > 0 {
      let i = self.table_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.table_state.select(Some(i));
    }
  }

  pub fn export_csv(&mut self) {
    if self.rows.is_empty() {
      self.set_error("No rows to export. Run a search first.".to_string());
      return;
    }
    match export::write_rows(&self.rows) {
      Ok(path) => {
        info!(path = %path.display(), rows = self.rows.len(), "export: wrote CSV");
        self.status_message = Some(format!("Exported {} row(s) → {}", self.rows.len(), path.display()));
      }
      Err(e) => self.set_error(format!("Export failed: {:#}", e)),
    }
  }

  /// Open the selected row's URL in the default browser.
  pub fn open_selected(&mut self) {
    let Some(url) = self.selected_row().map(|r| r.url.clone()) else { return };
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(not(target_os = "macos"))]
    let cmd = "xdg-open";
    match std::process::Command::new(cmd)
      .arg(&url)
      .stdin(std::process::Stdio::null())
      .stdout(std::process::Stdio::null())
      .stderr(std::process::Stdio::null())
      .spawn()
    {
      Ok(mut child) => {
        // Reap the child in a background thread to avoid zombie processes.
        std::thread::spawn(move || {
          let _ = child.wait();
        });
        self.status_message = Some(format!("Opened {}", url));
      }
      Err(e) => self.set_error(format!("Could not open browser: {}", e)),
    }
  }
}
