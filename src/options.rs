//! Validated search options and the fixed facet vocabularies
//! (categories, view thresholds, duration buckets).

use chrono::NaiveDate;
use thiserror::Error;

use crate::constants::constants;

/// Labeled minimum-view thresholds offered in the filter panel.
pub const VIEW_THRESHOLDS: [(&str, u64); 10] = [
  ("Any", 0),
  ("10K+", 10_000),
  ("50K+", 50_000),
  ("100K+", 100_000),
  ("250K+", 250_000),
  ("1M+", 1_000_000),
  ("5M+", 5_000_000),
  ("10M+", 10_000_000),
  ("50M+", 50_000_000),
  ("100M+", 100_000_000),
];

/// The kind of entity a search candidate represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
  Video,
  Playlist,
  Channel,
}

impl Category {
  /// Fixed iteration order: videos first, then playlists, then channels.
  pub const ALL: [Category; 3] = [Category::Video, Category::Playlist, Category::Channel];

  /// The value the search endpoint's `type` parameter takes; also the
  /// display label for the Type column.
  pub fn label(self) -> &'static str {
    match self {
      Category::Video => "video",
      Category::Playlist => "playlist",
      Category::Channel => "channel",
    }
  }

  /// Canonical watch/playlist/channel URL for an identifier of this category.
  pub fn url_for(self, id: &str) -> String {
    match self {
      Category::Video => format!("https://youtu.be/{}", id),
      Category::Playlist => format!("https://www.youtube.com/playlist?list={}", id),
      Category::Channel => format!("https://www.youtube.com/channel/{}", id),
    }
  }
}

/// Duration facet. A fixed closed set; anything else is rejected at the
/// options boundary by construction (there is no parse from free text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationBucket {
  #[default]
  Any,
  /// Under 4 minutes.
  Short,
  /// 4–20 minutes, inclusive on both ends.
  Medium,
  /// Over 20 minutes.
  Long,
  /// At least one hour.
  OverOneHour,
  /// At least three hours.
  OverThreeHours,
}

impl DurationBucket {
  pub const ALL: [DurationBucket; 6] = [
    DurationBucket::Any,
    DurationBucket::Short,
    DurationBucket::Medium,
    DurationBucket::Long,
    DurationBucket::OverOneHour,
    DurationBucket::OverThreeHours,
  ];

  pub fn label(self) -> &'static str {
    match self {
      DurationBucket::Any => "Any",
      DurationBucket::Short => "< 4 min",
      DurationBucket::Medium => "4–20 min",
      DurationBucket::Long => "> 20 min",
      DurationBucket::OverOneHour => "≥ 60 min",
      DurationBucket::OverThreeHours => "≥ 180 min",
    }
  }
}

/// Why a set of raw inputs failed to become `SearchOptions`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
  #[error("Please enter a search query.")]
  EmptyQuery,
  #[error("Select at least one type (Videos, Playlists, or Channels).")]
  NoCategories,
  #[error("'{0}' is not a valid date (expected YYYY-MM-DD).")]
  BadDate(String),
}

/// One validated user request. Immutable once constructed; invalid
/// combinations never get past [`SearchOptions::new`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
  pub query: String,
  /// Category inclusion flags in [`Category::ALL`] order.
  pub include: [bool; 3],
  pub min_views: u64,
  pub duration: DurationBucket,
  pub published_after: Option<NaiveDate>,
  pub published_before: Option<NaiveDate>,
  pub max_pages_per_type: u32,
}

impl SearchOptions {
  /// Validate raw inputs into options. Dates are `YYYY-MM-DD` strings or
  /// `None`; the page cap is clamped to the configured 1–10 range rather
  /// than rejected.
  pub fn new(
    query: &str,
    include: [bool; 3],
    min_views: u64,
    duration: DurationBucket,
    after: Option<&str>,
    before: Option<&str>,
    pages: u32,
  ) -> Result<Self, OptionsError> {
    let query = query.trim().to_string();
    if query.is_empty() {
      return Err(OptionsError::EmptyQuery);
    }
    if !include.iter().any(|&on| on) {
      return Err(OptionsError::NoCategories);
    }
    let parse_day = |s: &str| {
      NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| OptionsError::BadDate(s.to_string()))
    };
    let published_after = after.map(parse_day).transpose()?;
    let published_before = before.map(parse_day).transpose()?;
    let max_pages_per_type = pages.clamp(constants().min_pages, constants().max_pages);

    Ok(Self { query, include, min_views, duration, published_after, published_before, max_pages_per_type })
  }

  /// The active categories, in fixed video → playlist → channel order.
  pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
    Category::ALL.into_iter().zip(self.include).filter(|&(_, on)| on).map(|(c, _)| c)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_query_is_rejected() {
    assert_eq!(
      SearchOptions::new("   ", [true, false, false], 0, DurationBucket::Any, None, None, 5).unwrap_err(),
      OptionsError::EmptyQuery
    );
  }

  #[test]
  fn no_categories_is_rejected() {
    assert_eq!(
      SearchOptions::new("rust", [false, false, false], 0, DurationBucket::Any, None, None, 5).unwrap_err(),
      OptionsError::NoCategories
    );
  }

  #[test]
  fn bad_date_is_rejected() {
    let err =
      SearchOptions::new("rust", [true, false, false], 0, DurationBucket::Any, Some("2024-13-40"), None, 5)
        .unwrap_err();
    assert_eq!(err, OptionsError::BadDate("2024-13-40".to_string()));

    let err = SearchOptions::new("rust", [true, false, false], 0, DurationBucket::Any, None, Some("nope"), 5)
      .unwrap_err();
    assert_eq!(err, OptionsError::BadDate("nope".to_string()));
  }

  #[test]
  fn valid_dates_parse() {
    let opts = SearchOptions::new(
      "rust",
      [true, true, true],
      10_000,
      DurationBucket::Medium,
      Some("2024-01-31"),
      Some("2024-06-01"),
      3,
    )
    .unwrap();
    assert_eq!(opts.published_after, NaiveDate::from_ymd_opt(2024, 1, 31));
    assert_eq!(opts.published_before, NaiveDate::from_ymd_opt(2024, 6, 1));
  }

  #[test]
  fn page_cap_clamps_to_bounds() {
    let low = SearchOptions::new("q", [true, false, false], 0, DurationBucket::Any, None, None, 0).unwrap();
    assert_eq!(low.max_pages_per_type, 1);
    let high = SearchOptions::new("q", [true, false, false], 0, DurationBucket::Any, None, None, 99).unwrap();
    assert_eq!(high.max_pages_per_type, 10);
  }

  #[test]
  fn categories_follow_fixed_order() {
    let opts = SearchOptions::new("q", [true, false, true], 0, DurationBucket::Any, None, None, 1).unwrap();
    let cats: Vec<Category> = opts.categories().collect();
    assert_eq!(cats, vec![Category::Video, Category::Channel]);
  }

  #[test]
  fn query_is_trimmed() {
    let opts = SearchOptions::new("  rust tutorial  ", [true, false, false], 0, DurationBucket::Any, None, None, 1)
      .unwrap();
    assert_eq!(opts.query, "rust tutorial");
  }

  #[test]
  fn category_urls() {
    assert_eq!(Category::Video.url_for("abc123"), "https://youtu.be/abc123");
    assert_eq!(Category::Playlist.url_for("PL1"), "https://www.youtube.com/playlist?list=PL1");
    assert_eq!(Category::Channel.url_for("UC9"), "https://www.youtube.com/channel/UC9");
  }
}
