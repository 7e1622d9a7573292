//! Client-side facet predicates applied after the API returns raw results.

use crate::options::DurationBucket;

/// True when every whitespace token of `query` appears (case-insensitively)
/// as a substring of `title`. A query that reduces to whitespace falls back
/// to whole-string containment. The search endpoint ranks by relevance over
/// titles, descriptions, and tags; this re-check approximates title-only
/// matching.
pub fn matches_title(query: &str, title: &str) -> bool {
  if query.is_empty() || title.is_empty() {
    return false;
  }
  let q = query.to_lowercase();
  let q = q.trim();
  let t = title.to_lowercase();
  let tokens: Vec<&str> = q.split_whitespace().collect();
  if tokens.is_empty() { t.contains(q) } else { tokens.iter().all(|tok| t.contains(tok)) }
}

/// Membership test for the selected duration bucket.
pub fn duration_in_bucket(bucket: DurationBucket, seconds: u64) -> bool {
  match bucket {
    DurationBucket::Any => true,
    DurationBucket::Short => seconds < 4 * 60,
    DurationBucket::Medium => (4 * 60..=20 * 60).contains(&seconds),
    DurationBucket::Long => seconds > 20 * 60,
    DurationBucket::OverOneHour => seconds >= 60 * 60,
    DurationBucket::OverThreeHours => seconds >= 3 * 60 * 60,
  }
}

/// True when `min_views` is 0 (no floor) or `views` meets it.
pub fn meets_view_floor(min_views: u64, views: u64) -> bool {
  min_views == 0 || views >= min_views
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- matches_title ---

  #[test]
  fn all_tokens_must_appear() {
    assert!(matches_title("python tutorial", "Python Tutorial for Beginners"));
    assert!(!matches_title("python tutorial", "Tutorial on guitar"));
  }

  #[test]
  fn tokens_match_as_substrings_not_words() {
    assert!(matches_title("tut", "Python Tutorial"));
  }

  #[test]
  fn empty_query_or_title_never_matches() {
    assert!(!matches_title("", "Some Title"));
    assert!(!matches_title("query", ""));
  }

  #[test]
  fn whitespace_query_falls_back_to_containment() {
    // "   ".trim() is empty and "" is contained in any title.
    assert!(matches_title("   ", "Anything"));
  }

  #[test]
  fn matching_is_case_insensitive() {
    assert!(matches_title("RUST async", "Intro to Async Rust"));
  }

  // --- duration_in_bucket ---

  #[test]
  fn bucket_boundaries() {
    assert!(duration_in_bucket(DurationBucket::Short, 239));
    assert!(!duration_in_bucket(DurationBucket::Short, 240));

    assert!(duration_in_bucket(DurationBucket::Medium, 240));
    assert!(duration_in_bucket(DurationBucket::Medium, 1200));
    assert!(!duration_in_bucket(DurationBucket::Medium, 239));
    assert!(!duration_in_bucket(DurationBucket::Medium, 1201));

    assert!(duration_in_bucket(DurationBucket::Long, 1201));
    assert!(!duration_in_bucket(DurationBucket::Long, 1200));

    assert!(duration_in_bucket(DurationBucket::OverOneHour, 3600));
    assert!(!duration_in_bucket(DurationBucket::OverOneHour, 3599));

    assert!(duration_in_bucket(DurationBucket::OverThreeHours, 10800));
    assert!(!duration_in_bucket(DurationBucket::OverThreeHours, 10799));
  }

  #[test]
  fn buckets_are_independent_tests() {
    // 3600s satisfies both Long and OverOneHour; only the selected bucket is exclusive.
    assert!(duration_in_bucket(DurationBucket::Long, 3600));
    assert!(duration_in_bucket(DurationBucket::OverOneHour, 3600));
  }

  #[test]
  fn any_always_passes() {
    for s in [0, 239, 240, 1200, 1201, 3600, 10800, u64::MAX] {
      assert!(duration_in_bucket(DurationBucket::Any, s));
    }
  }

  // --- meets_view_floor ---

  #[test]
  fn zero_floor_passes_everything() {
    assert!(meets_view_floor(0, 0));
    assert!(meets_view_floor(0, 123));
  }

  #[test]
  fn floor_is_inclusive() {
    assert!(meets_view_floor(10_000, 10_000));
    assert!(meets_view_floor(10_000, 50_000));
    assert!(!meets_view_floor(10_000, 9_999));
  }
}
