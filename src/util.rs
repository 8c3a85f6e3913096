//! Small utility helpers used across modules.

/// Round to 2 decimal places, ties to even.
/// Percentages must be stable across runs; the tie rule matters less than
/// applying the same one everywhere.
pub fn round2(x: f64) -> f64 {
  (x * 100.0).round_ties_even() / 100.0
}

/// Percentage with a zero-denominator guard (0 when max is 0), rounded.
pub fn percentage(raw: f64, max: f64) -> f64 {
  if max > 0.0 {
    round2(raw / max * 100.0)
  } else {
    0.0
  }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads. The cut backs
/// up to a char boundary so multibyte payloads cannot panic the slice.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
