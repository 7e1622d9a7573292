//! YouTube Data API v3 clients: paginated search and batch statistics
//! enrichment. All network access lives here, behind an explicitly
//! constructed [`ApiClient`] — no process-wide session state.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::constants::constants;
use crate::duration;
use crate::options::Category;
use crate::pipeline::VideoApi;

// --- Errors ---

/// Failure surfaced by either API client. `Api` carries the upstream reason
/// code and message when the response body parses as the structured error
/// envelope, otherwise the raw body text with an empty reason.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("YouTube API error {status} (reason={reason:?}): {message}")]
  Api { status: u16, reason: String, message: String },
}

impl ApiError {
  /// Map quota/rate-limit reason codes to actionable guidance for the status
  /// line. Returns `None` for everything else; the caller then shows the
  /// error as-is.
  pub fn user_hint(&self) -> Option<&'static str> {
    let ApiError::Api { reason, message, .. } = self else { return None };
    let hay = format!("{} {}", reason, message).to_lowercase();
    if hay.contains("quotaexceeded") || hay.contains("dailylimitexceeded") {
      Some(
        "YouTube Data API daily quota has been exhausted. Wait for the daily reset or reduce pages/types, and ensure you're using your own API key.",
      )
    } else if hay.contains("ratelimitexceeded") {
      Some(
        "You're sending requests too quickly for the current quota. Lower the Pages setting, disable Playlists/Channels, or try again shortly.",
      )
    } else if hay.contains("forbidden") && hay.contains("quota") {
      Some(
        "Access forbidden due to quota restrictions. Verify your API key is enabled for YouTube Data API v3 and that the project has available quota.",
      )
    } else {
      None
    }
  }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  #[serde(default)]
  message: String,
  #[serde(default)]
  errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
  #[serde(default)]
  reason: String,
}

fn error_from_body(status: u16, body: &str) -> ApiError {
  match serde_json::from_str::<ErrorEnvelope>(body) {
    Ok(env) => ApiError::Api {
      status,
      reason: env.error.errors.first().map(|e| e.reason.clone()).unwrap_or_default(),
      message: env.error.message,
    },
    Err(_) => ApiError::Api { status, reason: String::new(), message: body.trim().to_string() },
  }
}

// --- Data types ---

/// A raw, unenriched search hit. Exists only for the duration of one search.
#[derive(Debug, Clone)]
pub struct Candidate {
  pub category: Category,
  pub id: String,
  pub title: String,
  pub channel: String,
  /// RFC3339 publish timestamp as returned by the search snippet.
  pub published_at: String,
  pub thumb: String,
}

/// One page of search results plus the continuation token, if any. Absence
/// of the token means no more pages.
#[derive(Debug, Default)]
pub struct SearchPage {
  pub items: Vec<Candidate>,
  pub next_page_token: Option<String>,
}

/// Per-video statistics and duration, keyed by video id in the batch result.
/// Canonical title/channel from the snippet may override the search hit's.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentRecord {
  pub views: u64,
  pub likes: u64,
  pub comments: u64,
  pub duration_secs: u64,
  pub published_at: String,
  pub title: String,
  pub channel: String,
  pub thumb: String,
}

// --- Wire format ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
  #[serde(default)]
  items: Vec<SearchItem>,
  next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
  #[serde(default)]
  id: IdBlock,
  #[serde(default)]
  snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdBlock {
  video_id: Option<String>,
  playlist_id: Option<String>,
  channel_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
  #[serde(default)]
  title: String,
  #[serde(default)]
  channel_title: String,
  #[serde(default)]
  published_at: String,
  #[serde(default)]
  thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
  medium: Option<Thumb>,
  default: Option<Thumb>,
}

#[derive(Debug, Deserialize)]
struct Thumb {
  #[serde(default)]
  url: String,
}

impl Thumbnails {
  /// Medium thumbnail when present, else the default one, else empty.
  fn best_url(&self) -> String {
    self.medium.as_ref().or(self.default.as_ref()).map(|t| t.url.clone()).unwrap_or_default()
  }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
  #[serde(default)]
  items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
  #[serde(default)]
  id: String,
  #[serde(default)]
  snippet: Snippet,
  #[serde(default)]
  statistics: Statistics,
  #[serde(default, rename = "contentDetails")]
  content_details: ContentDetails,
}

/// The API serializes counts as JSON strings; missing fields decode as 0.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
  view_count: Option<String>,
  like_count: Option<String>,
  comment_count: Option<String>,
}

impl Statistics {
  fn count(field: &Option<String>) -> u64 {
    field.as_deref().unwrap_or("0").parse().unwrap_or(0)
  }
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
  #[serde(default)]
  duration: String,
}

fn candidate_from_item(category: Category, item: SearchItem) -> Option<Candidate> {
  let id = match category {
    Category::Video => item.id.video_id,
    Category::Playlist => item.id.playlist_id,
    Category::Channel => item.id.channel_id,
  }?;
  let snip = item.snippet;
  // Channel hits have no separate owner; the title is the channel name.
  let channel = if category == Category::Channel { snip.title.clone() } else { snip.channel_title };
  Some(Candidate {
    category,
    id,
    title: snip.title,
    channel,
    published_at: snip.published_at,
    thumb: snip.thumbnails.best_url(),
  })
}

// --- Date fences ---

/// First instant of the named day, so the bound includes the whole day.
fn day_start(d: NaiveDate) -> String {
  format!("{}T00:00:00Z", d.format("%Y-%m-%d"))
}

/// Last instant of the named day, inclusive.
fn day_end(d: NaiveDate) -> String {
  format!("{}T23:59:59Z", d.format("%Y-%m-%d"))
}

// --- Client ---

/// HTTP client for both endpoints. Constructed per search run and handed to
/// the pipeline, which makes substitution trivial in tests.
pub struct ApiClient {
  http: Client,
  api_key: String,
}

impl ApiClient {
  pub fn new(api_key: String) -> Result<Self, ApiError> {
    let http = Client::builder()
      .user_agent(constants().user_agent.clone())
      .timeout(Duration::from_secs(constants().request_timeout_secs))
      .build()?;
    Ok(Self { http, api_key })
  }
}

impl VideoApi for ApiClient {
  /// One page of `/search` for a single category. Video searches are ordered
  /// by view count; other categories keep the endpoint's relevance order
  /// (they have no view counts to order by).
  async fn search(
    &self,
    query: &str,
    category: Category,
    after: Option<NaiveDate>,
    before: Option<NaiveDate>,
    page_token: Option<&str>,
  ) -> Result<SearchPage, ApiError> {
    let mut params: Vec<(&str, String)> = vec![
      ("part", "snippet".to_string()),
      ("q", query.to_string()),
      ("type", category.label().to_string()),
      ("maxResults", constants().page_size.to_string()),
      ("key", self.api_key.clone()),
    ];
    if category == Category::Video {
      params.push(("order", "viewCount".to_string()));
    }
    if let Some(d) = after {
      params.push(("publishedAfter", day_start(d)));
    }
    if let Some(d) = before {
      params.push(("publishedBefore", day_end(d)));
    }
    if let Some(tok) = page_token {
      params.push(("pageToken", tok.to_string()));
    }

    let resp = self.http.get(&constants().search_url).query(&params).send().await?;
    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(error_from_body(status.as_u16(), &body));
    }
    let parsed: SearchResponse = resp.json().await?;
    debug!(category = category.label(), items = parsed.items.len(), "search page fetched");

    let items = parsed.items.into_iter().filter_map(|it| candidate_from_item(category, it)).collect();
    Ok(SearchPage { items, next_page_token: parsed.next_page_token })
  }

  /// Batch lookup on `/videos`. At most one batch worth of ids is sent;
  /// callers chunk larger id lists. Empty input returns an empty map
  /// without touching the network.
  async fn enrich(&self, ids: &[String]) -> Result<HashMap<String, EnrichmentRecord>, ApiError> {
    if ids.is_empty() {
      return Ok(HashMap::new());
    }
    let batch = &ids[..ids.len().min(constants().enrich_batch)];
    let params = [
      ("part", "contentDetails,statistics,snippet".to_string()),
      ("id", batch.join(",")),
      ("maxResults", constants().page_size.to_string()),
      ("key", self.api_key.clone()),
    ];

    let resp = self.http.get(&constants().videos_url).query(&params).send().await?;
    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(error_from_body(status.as_u16(), &body));
    }
    let parsed: VideosResponse = resp.json().await?;
    debug!(requested = batch.len(), returned = parsed.items.len(), "enrichment batch fetched");

    let mut by_id = HashMap::with_capacity(parsed.items.len());
    for item in parsed.items {
      if item.id.is_empty() {
        continue;
      }
      let record = EnrichmentRecord {
        views: Statistics::count(&item.statistics.view_count),
        likes: Statistics::count(&item.statistics.like_count),
        comments: Statistics::count(&item.statistics.comment_count),
        duration_secs: duration::decode(&item.content_details.duration),
        published_at: item.snippet.published_at.clone(),
        title: item.snippet.title.clone(),
        channel: item.snippet.channel_title.clone(),
        thumb: item.snippet.thumbnails.best_url(),
      };
      by_id.insert(item.id, record);
    }
    Ok(by_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- date fences ---

  #[test]
  fn day_bounds_are_inclusive_of_the_named_day() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    assert_eq!(day_start(d), "2024-03-07T00:00:00Z");
    assert_eq!(day_end(d), "2024-03-07T23:59:59Z");
  }

  // --- error envelope ---

  #[test]
  fn structured_error_body_yields_reason_and_message() {
    let body = r#"{"error":{"code":403,"message":"Quota exceeded.","errors":[{"reason":"quotaExceeded"}]}}"#;
    match error_from_body(403, body) {
      ApiError::Api { status, reason, message } => {
        assert_eq!(status, 403);
        assert_eq!(reason, "quotaExceeded");
        assert_eq!(message, "Quota exceeded.");
      }
      other => panic!("unexpected error: {:?}", other),
    }
  }

  #[test]
  fn unparseable_error_body_falls_back_to_raw_text() {
    match error_from_body(500, "<html>oops</html>\n") {
      ApiError::Api { reason, message, .. } => {
        assert!(reason.is_empty());
        assert_eq!(message, "<html>oops</html>");
      }
      other => panic!("unexpected error: {:?}", other),
    }
  }

  #[test]
  fn quota_reasons_map_to_hints() {
    let quota = error_from_body(
      403,
      r#"{"error":{"message":"Daily Limit Exceeded.","errors":[{"reason":"dailyLimitExceeded"}]}}"#,
    );
    assert!(quota.user_hint().unwrap().contains("quota"));

    let rate = error_from_body(
      403,
      r#"{"error":{"message":"slow down","errors":[{"reason":"userRateLimitExceeded"}]}}"#,
    );
    assert!(rate.user_hint().unwrap().contains("too quickly"));

    let plain = error_from_body(404, r#"{"error":{"message":"not found","errors":[{"reason":"notFound"}]}}"#);
    assert!(plain.user_hint().is_none());
  }

  // --- wire decoding ---

  #[test]
  fn search_items_decode_into_candidates() {
    let body = r#"{
      "nextPageToken": "CAUQAA",
      "items": [
        {
          "id": {"videoId": "abc123"},
          "snippet": {
            "title": "Rust Tutorial",
            "channelTitle": "RustChan",
            "publishedAt": "2024-02-03T10:00:00Z",
            "thumbnails": {"medium": {"url": "https://img/m.jpg"}, "default": {"url": "https://img/d.jpg"}}
          }
        },
        {
          "id": {"playlistId": "PLxyz"},
          "snippet": {"title": "Not a video", "channelTitle": "X", "publishedAt": ""}
        }
      ]
    }"#;
    let parsed: SearchResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.next_page_token.as_deref(), Some("CAUQAA"));

    let candidates: Vec<Candidate> =
      parsed.items.into_iter().filter_map(|it| candidate_from_item(Category::Video, it)).collect();
    // The playlist item has no videoId and is skipped for a video search.
    assert_eq!(candidates.len(), 1);
    let c = &candidates[0];
    assert_eq!(c.id, "abc123");
    assert_eq!(c.title, "Rust Tutorial");
    assert_eq!(c.channel, "RustChan");
    assert_eq!(c.published_at, "2024-02-03T10:00:00Z");
    assert_eq!(c.thumb, "https://img/m.jpg");
  }

  #[test]
  fn channel_candidates_use_title_as_channel_name() {
    let body = r#"{"items":[{"id":{"channelId":"UC42"},"snippet":{"title":"Some Channel"}}]}"#;
    let parsed: SearchResponse = serde_json::from_str(body).unwrap();
    let c = parsed
      .items
      .into_iter()
      .filter_map(|it| candidate_from_item(Category::Channel, it))
      .next()
      .unwrap();
    assert_eq!(c.channel, "Some Channel");
  }

  #[test]
  fn video_stats_decode_with_missing_fields_as_zero() {
    let body = r#"{
      "items": [
        {
          "id": "abc123",
          "snippet": {"title": "Canonical Title", "channelTitle": "Canonical Chan", "publishedAt": "2024-02-03T10:00:00Z"},
          "statistics": {"viewCount": "1234567", "likeCount": "890"},
          "contentDetails": {"duration": "PT1H2M3S"}
        }
      ]
    }"#;
    let parsed: VideosResponse = serde_json::from_str(body).unwrap();
    let item = &parsed.items[0];
    assert_eq!(Statistics::count(&item.statistics.view_count), 1_234_567);
    assert_eq!(Statistics::count(&item.statistics.like_count), 890);
    // commentCount is absent upstream; it defaults to 0, not an error.
    assert_eq!(Statistics::count(&item.statistics.comment_count), 0);
    assert_eq!(crate::duration::decode(&item.content_details.duration), 3723);
  }
}
