//! The search-and-enrichment pipeline: one linear pass from validated
//! options to a filtered, ordered result set. No state survives between
//! invocations; any API failure aborts the run and discards partial work.

use std::collections::HashMap;
use std::future::Future;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::constants::constants;
use crate::duration;
use crate::filters;
use crate::options::{Category, SearchOptions};
use crate::youtube::{ApiError, EnrichmentRecord, SearchPage};

// --- API seam ---

/// The two API operations the pipeline depends on. `youtube::ApiClient`
/// implements this against the live endpoints; tests substitute a scripted
/// mock. The pipeline is generic over it, so no boxing is involved.
pub trait VideoApi {
  fn search(
    &self,
    query: &str,
    category: Category,
    after: Option<NaiveDate>,
    before: Option<NaiveDate>,
    page_token: Option<&str>,
  ) -> impl Future<Output = Result<SearchPage, ApiError>> + Send;

  fn enrich(&self, ids: &[String]) -> impl Future<Output = Result<HashMap<String, EnrichmentRecord>, ApiError>> + Send;
}

// --- Result rows ---

/// A presentation-ready result. Counts and duration are `None` for playlist
/// and channel rows, which carry no statistics; their display fields render
/// blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
  pub title: String,
  pub channel: String,
  pub category: Category,
  pub views: Option<u64>,
  pub likes: Option<u64>,
  pub comments: Option<u64>,
  pub duration_secs: Option<u64>,
  /// Publish date as a `YYYY-MM-DD` string (empty when unknown).
  pub published: String,
  pub url: String,
  pub thumb: String,
}

impl ResultRow {
  pub fn views_display(&self) -> String {
    self.views.map(group_digits).unwrap_or_default()
  }

  pub fn likes_display(&self) -> String {
    self.likes.map(group_digits).unwrap_or_default()
  }

  pub fn comments_display(&self) -> String {
    self.comments.map(group_digits).unwrap_or_default()
  }

  pub fn duration_display(&self) -> String {
    self.duration_secs.map(duration::encode).unwrap_or_default()
  }
}

/// Group digits with thousands separators: 1234567 → "1,234,567".
pub fn group_digits(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}

// --- Orchestrator ---

/// Run one search: paginate every active category in fixed order, title-match
/// candidates at ingestion, batch-enrich the video hits, apply the view and
/// duration facets, and return rows ordered by view count descending
/// (playlists/channels sort as zero and trail the videos).
pub async fn run<A: VideoApi>(api: &A, opts: &SearchOptions) -> Result<Vec<ResultRow>, ApiError> {
  let mut candidates = Vec::new();

  for category in opts.categories() {
    let mut page_token: Option<String> = None;
    let mut pages = 0u32;
    loop {
      let page = api
        .search(&opts.query, category, opts.published_after, opts.published_before, page_token.as_deref())
        .await?;
      // Title matching happens at ingestion, before enrichment is paid for.
      candidates.extend(page.items.into_iter().filter(|c| filters::matches_title(&opts.query, &c.title)));
      pages += 1;
      page_token = page.next_page_token;
      if page_token.is_none() || pages >= opts.max_pages_per_type {
        break;
      }
    }
    debug!(category = category.label(), pages, retained = candidates.len(), "category pass done");
  }

  let video_ids: Vec<String> =
    candidates.iter().filter(|c| c.category == Category::Video).map(|c| c.id.clone()).collect();
  let mut records: HashMap<String, EnrichmentRecord> = HashMap::new();
  for batch in video_ids.chunks(constants().enrich_batch) {
    records.extend(api.enrich(batch).await?);
  }

  let mut rows = Vec::new();
  for c in candidates {
    let published: String = c.published_at.chars().take(10).collect();
    match c.category {
      Category::Video => {
        // Videos missing from the batch result keep zero-valued stats and
        // still face the facet filters like any other video row.
        let meta = records.get(&c.id);
        let views = meta.map_or(0, |m| m.views);
        let duration_secs = meta.map_or(0, |m| m.duration_secs);
        if !filters::meets_view_floor(opts.min_views, views) {
          continue;
        }
        if !filters::duration_in_bucket(opts.duration, duration_secs) {
          continue;
        }
        let title = meta.filter(|m| !m.title.is_empty()).map_or(c.title, |m| m.title.clone());
        let channel = meta.filter(|m| !m.channel.is_empty()).map_or(c.channel, |m| m.channel.clone());
        rows.push(ResultRow {
          title,
          channel,
          category: Category::Video,
          views: Some(views),
          likes: Some(meta.map_or(0, |m| m.likes)),
          comments: Some(meta.map_or(0, |m| m.comments)),
          duration_secs: Some(duration_secs),
          published,
          url: Category::Video.url_for(&c.id),
          thumb: c.thumb,
        });
      }
      other => {
        // No numeric filtering applies; stats render blank.
        rows.push(ResultRow {
          title: c.title,
          channel: c.channel,
          category: other,
          views: None,
          likes: None,
          comments: None,
          duration_secs: None,
          published,
          url: other.url_for(&c.id),
          thumb: c.thumb,
        });
      }
    }
  }

  rows.sort_by(|a, b| b.views.unwrap_or(0).cmp(&a.views.unwrap_or(0)));
  info!(rows = rows.len(), "search pipeline complete");
  Ok(rows)
}
