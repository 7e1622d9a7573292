//! Codec for the ISO-8601-style durations the videos endpoint returns
//! (e.g. `PT1H2M3S`) and the `mm:ss` / `hh:mm:ss` display form.

/// Decode an ISO-8601 duration into total seconds.
///
/// Lenient on purpose: digit runs accumulate until an `H`/`M`/`S` unit marker
/// is seen; `P` and `T` are skipped; any other character resets the run.
/// Malformed or empty input decodes to 0 rather than erroring, so bad
/// upstream data shows up as a zero-length video instead of a failed search.
pub fn decode(iso: &str) -> u64 {
  let mut total: u64 = 0;
  let mut num: u64 = 0;
  for ch in iso.chars() {
    match ch {
      '0'..='9' => {
        num = num.saturating_mul(10).saturating_add(ch as u64 - '0' as u64);
      }
      'P' | 'T' => {}
      'H' => {
        total = total.saturating_add(num.saturating_mul(3600));
        num = 0;
      }
      'M' => {
        total = total.saturating_add(num.saturating_mul(60));
        num = 0;
      }
      'S' => {
        total = total.saturating_add(num);
        num = 0;
      }
      _ => {
        num = 0;
      }
    }
  }
  total
}

/// Format seconds as `mm:ss`, switching to `hh:mm:ss` at one hour.
/// Fields are zero-padded to two digits.
pub fn encode(secs: u64) -> String {
  let h = secs / 3600;
  let m = (secs % 3600) / 60;
  let s = secs % 60;
  if h > 0 { format!("{:02}:{:02}:{:02}", h, m, s) } else { format!("{:02}:{:02}", m, s) }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- decode ---

  #[test]
  fn decode_full_duration() {
    assert_eq!(decode("PT1H2M3S"), 3723);
  }

  #[test]
  fn decode_minutes_seconds() {
    assert_eq!(decode("PT4M13S"), 253);
  }

  #[test]
  fn decode_hours_only() {
    assert_eq!(decode("PT3H"), 10800);
  }

  #[test]
  fn decode_zero_and_empty() {
    assert_eq!(decode("PT0S"), 0);
    assert_eq!(decode(""), 0);
  }

  #[test]
  fn decode_malformed_yields_zero() {
    assert_eq!(decode("garbage"), 0);
    assert_eq!(decode("Px?!"), 0);
  }

  #[test]
  fn decode_unknown_marker_resets_digits() {
    // The "12" before the unrecognized 'X' must not leak into the minutes.
    assert_eq!(decode("PT12X3M"), 180);
  }

  #[test]
  fn decode_multi_day_style_hours() {
    assert_eq!(decode("PT26H"), 26 * 3600);
  }

  // --- encode ---

  #[test]
  fn encode_under_an_hour_is_mm_ss() {
    assert_eq!(encode(0), "00:00");
    assert_eq!(encode(59), "00:59");
    assert_eq!(encode(253), "04:13");
    assert_eq!(encode(3599), "59:59");
  }

  #[test]
  fn encode_hour_and_up_is_hh_mm_ss() {
    assert_eq!(encode(3600), "01:00:00");
    assert_eq!(encode(3723), "01:02:03");
    assert_eq!(encode(10 * 3600 + 5), "10:00:05");
  }

  #[test]
  fn encode_decode_round_trip() {
    for d in [0u64, 1, 59, 60, 239, 240, 1200, 1201, 3599, 3600, 10800, 86399] {
      let hms = encode(d);
      // Re-encode via an ISO rendering of the same total.
      let iso = format!("PT{}H{}M{}S", d / 3600, (d % 3600) / 60, d % 60);
      assert_eq!(decode(&iso), d, "round trip failed for {} ({})", d, hms);
    }
  }
}
