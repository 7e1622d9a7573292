//! CSV export of the current result rows.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::constants::constants;
use crate::pipeline::ResultRow;

/// Column headers, matching the results table order.
pub const HEADERS: [&str; 9] =
  ["Title", "Channel", "Type", "Views", "Likes", "Comments", "Duration", "Published", "URL"];

/// Quote a field per RFC 4180 when it contains a comma, quote, or newline.
fn csv_field(s: &str) -> String {
  if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_string()
  }
}

/// Render rows as CSV text, header line first, CRLF line endings.
pub fn to_csv(rows: &[ResultRow]) -> String {
  let mut out = String::new();
  out.push_str(&HEADERS.join(","));
  out.push_str("\r\n");
  for row in rows {
    let fields = [
      row.title.clone(),
      row.channel.clone(),
      row.category.label().to_string(),
      row.views_display(),
      row.likes_display(),
      row.comments_display(),
      row.duration_display(),
      row.published.clone(),
      row.url.clone(),
    ];
    let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
  }
  out
}

/// Write rows to a timestamped CSV in the working directory and return the
/// path.
pub fn write_rows(rows: &[ResultRow]) -> Result<PathBuf> {
  let name = format!("{}_{}.csv", constants().export_prefix, Local::now().format("%Y%m%d_%H%M%S"));
  let path = PathBuf::from(name);
  fs::write(&path, to_csv(rows)).with_context(|| format!("could not write {}", path.display()))?;
  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::options::Category;

  fn row(title: &str, views: Option<u64>) -> ResultRow {
    ResultRow {
      title: title.to_string(),
      channel: "Chan".to_string(),
      category: if views.is_some() { Category::Video } else { Category::Playlist },
      views,
      likes: views.map(|_| 12),
      comments: views.map(|_| 3),
      duration_secs: views.map(|_| 253),
      published: "2024-02-03".to_string(),
      url: "https://youtu.be/x".to_string(),
      thumb: String::new(),
    }
  }

  #[test]
  fn header_line_matches_table_order() {
    let csv = to_csv(&[]);
    assert_eq!(csv, "Title,Channel,Type,Views,Likes,Comments,Duration,Published,URL\r\n");
  }

  #[test]
  fn fields_with_commas_and_quotes_are_escaped() {
    assert_eq!(csv_field("plain"), "plain");
    assert_eq!(csv_field("a,b"), "\"a,b\"");
    assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
  }

  #[test]
  fn video_rows_render_formatted_counts() {
    let csv = to_csv(&[row("Rust, fast", Some(1_234_567))]);
    let line = csv.lines().nth(1).unwrap();
    assert_eq!(line, "\"Rust, fast\",Chan,video,\"1,234,567\",12,3,04:13,2024-02-03,https://youtu.be/x");
  }

  #[test]
  fn playlist_rows_leave_stats_blank() {
    let csv = to_csv(&[row("Mix", None)]);
    let line = csv.lines().nth(1).unwrap();
    assert_eq!(line, "Mix,Chan,playlist,,,,,2024-02-03,https://youtu.be/x");
  }
}
