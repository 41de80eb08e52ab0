// src/process/reshape.rs

use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, instrument};

use super::raw_table::{RawRecord, RawTable};
use super::utils::{
    format_mark, is_event_header, is_result_token, normalize_ws, null_if_empty, parse_mark, FOUL,
};

/// A single attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialResult {
    Mark(f64),
    Foul,
}

impl TrialResult {
    /// Only called on tokens that passed `is_result_token`.
    fn from_token(token: &str) -> Self {
        match parse_mark(token) {
            Some(v) => TrialResult::Mark(v),
            None => TrialResult::Foul,
        }
    }

    pub fn mark(&self) -> Option<f64> {
        match self {
            TrialResult::Mark(v) => Some(*v),
            TrialResult::Foul => None,
        }
    }

    pub fn is_foul(&self) -> bool {
        matches!(self, TrialResult::Foul)
    }
}

impl fmt::Display for TrialResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialResult::Mark(v) => f.write_str(&format_mark(*v)),
            TrialResult::Foul => f.write_str(FOUL),
        }
    }
}

impl Serialize for TrialResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One output row: one attempt at one meet. Field order is the file's column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trial {
    pub event_name: Option<String>,
    pub year: Option<String>,
    pub athlete: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "DOB")]
    pub date_of_birth: Option<String>,
    pub result: TrialResult,
}

/// A raw row after the context pass: every positional value it needs, with
/// the event name and meet context carried as data.
#[derive(Debug)]
struct AnnotatedRow<'a> {
    record: &'a RawRecord,
    event_name: Option<&'a str>,
    location: Option<&'a str>,
    date: Option<&'a str>,
}

impl<'a> AnnotatedRow<'a> {
    fn col(&self, n: usize) -> Option<&'a str> {
        null_if_empty(self.record.col(n))
    }
}

/// First pass: forward-fill `event_name` from header rows, drop the header
/// rows, then forward-fill meet location (`col_6`) and date (`col_7`).
fn annotate(table: &RawTable) -> Vec<AnnotatedRow<'_>> {
    let mut last_event: Option<&str> = None;
    let mut rows = Vec::with_capacity(table.records.len());

    for record in &table.records {
        let col_1 = null_if_empty(record.col(1));
        if is_event_header(null_if_empty(record.col(2))) {
            // a header with a blank name leaves the carried name in place
            if let Some(name) = col_1 {
                last_event = Some(name);
            }
        }
        let event_name = last_event;

        if col_1.is_some() && col_1 == event_name {
            continue;
        }
        rows.push(AnnotatedRow {
            record,
            event_name,
            location: None,
            date: None,
        });
    }

    let mut location: Option<&str> = None;
    let mut date: Option<&str> = None;
    for row in &mut rows {
        if let Some(v) = row.col(6) {
            location = Some(v);
        }
        if let Some(v) = row.col(7) {
            date = Some(v);
        }
        row.location = location;
        row.date = date;
    }

    rows
}

/// Split a multi-attempt cell into its kept tokens, in order.
pub fn result_tokens(cell: &str) -> Vec<&str> {
    cell.split_whitespace()
        .filter(|t| is_result_token(t))
        .collect()
}

/// Reshape the concatenated raw table into one row per attempt.
///
/// Only rows with a blank `col_1` after the context pass are trial rows. Their
/// `col_2` is tokenised on whitespace; each kept token becomes its own
/// [`Trial`] carrying the row's context. A row with no kept tokens yields
/// nothing.
#[instrument(level = "info", skip(table), fields(rows = table.records.len()))]
pub fn reshape(table: &RawTable) -> Vec<Trial> {
    let annotated = annotate(table);
    let mut trials = Vec::new();

    for row in annotated.iter().filter(|r| r.col(1).is_none()) {
        let Some(cell) = row.col(2) else {
            continue;
        };
        let cell = normalize_ws(cell);
        for token in result_tokens(&cell) {
            trials.push(Trial {
                event_name: row.event_name.map(str::to_string),
                year: row.col(3).map(str::to_string),
                athlete: row.col(4).map(str::to_string),
                location: row.location.map(str::to_string),
                date: row.date.map(str::to_string),
                date_of_birth: row.record.date_of_birth.clone(),
                result: TrialResult::from_token(token),
            });
        }
    }

    debug!(
        annotated = annotated.len(),
        trials = trials.len(),
        "reshaped raw table"
    );
    trials
}
