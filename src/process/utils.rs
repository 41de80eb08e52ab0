use once_cell::sync::Lazy;
use regex::Regex;

/// Foul marker as printed in a multi-attempt result cell.
pub const FOUL: &str = "X";

static SEASON_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}$").expect("season year regex should compile"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should compile"));

/// Empty cells and missing cells are the same thing downstream.
pub fn null_if_empty(raw: &str) -> Option<&str> {
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

/// Row-classification heuristic: the site prints the season year in the
/// second cell of the line that names an event.
pub fn is_event_header(col_2: Option<&str>) -> bool {
    col_2.is_some_and(|v| SEASON_YEAR.is_match(v))
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_ws(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw, " ").trim().to_string()
}

/// Parse the mark in front of any `/`-suffix (wind reading, combined height).
/// Non-finite values (`nan`, `inf`) are not marks.
pub fn parse_mark(token: &str) -> Option<f64> {
    let first = token.split('/').next().unwrap_or(token);
    first.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A token survives only if it is a mark or the foul marker.
pub fn is_result_token(token: &str) -> bool {
    token == FOUL || parse_mark(token).is_some()
}

/// Render a mark the way the dataset prints it: shortest round-trip digits,
/// with a trailing `.0` on whole numbers.
pub fn format_mark(mark: f64) -> String {
    if mark.fract() == 0.0 {
        format!("{:.1}", mark)
    } else {
        format!("{}", mark)
    }
}
