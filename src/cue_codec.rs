use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;
use serde::{Deserialize, Serialize};

// @module: WebVTT cue parsing and serialization

// @const: Cue file header
pub const VTT_HEADER: &str = "WEBVTT";

// @const: Separator between start and end time on a timing line
pub const TIMING_SEPARATOR: &str = "-->";

// @const: Bare cue index line
static CUE_INDEX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").expect("Invalid cue index regex")
});

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    // @field: Local authoring handle, never serialized to cue text
    pub id: String,

    // @field: Start time as HH:MM:SS.mmm
    pub start_time: String,

    // @field: End time as HH:MM:SS.mmm
    pub end_time: String,

    // @field: Cue text, lines joined by '\n'
    pub text: String,
}

impl Cue {
    /// Creates a cue with a fresh authoring id
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>, text: impl Into<String>) -> Self {
        Cue {
            id: new_cue_id(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            text: text.into(),
        }
    }

    /// Start time in seconds, NaN when the timestamp is malformed
    pub fn start_seconds(&self) -> f64 {
        timestamp_to_seconds(&self.start_time)
    }

    /// End time in seconds, NaN when the timestamp is malformed
    pub fn end_seconds(&self) -> f64 {
        timestamp_to_seconds(&self.end_time)
    }

    /// Whether a player could ever show this cue.
    ///
    /// Malformed timestamps are not rejected anywhere; they surface here as
    /// NaN bounds and the cue simply never becomes active.
    pub fn is_displayable(&self) -> bool {
        !self.start_seconds().is_nan() && !self.end_seconds().is_nan()
    }

    /// Whether the cue is active at `seconds` (bounds inclusive)
    pub fn is_active_at(&self, seconds: f64) -> bool {
        seconds >= self.start_seconds() && seconds <= self.end_seconds()
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {} {}", self.start_time, TIMING_SEPARATOR, self.end_time)?;
        writeln!(f, "{}", self.text)
    }
}

fn new_cue_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..9].to_string()
}

/// Parse cue text into cues.
///
/// A timing line opens a new cue and discards any cue still pending, so a
/// timing line directly followed by another timing line loses the first one.
/// A blank line flushes the pending cue only when it has text.
pub fn parse(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut current: Option<Cue> = None;

    for raw_line in text.split('\n') {
        let line = raw_line.trim();

        if line.contains(TIMING_SEPARATOR) {
            let mut bounds = line.split(TIMING_SEPARATOR).map(str::trim);
            let start = bounds.next().unwrap_or_default();
            let end = bounds.next().unwrap_or_default();
            if let Some(dropped) = current.take() {
                debug!("Dropping cue at {} without a closing blank line", dropped.start_time);
            }
            current = Some(Cue::new(start, end, String::new()));
        } else if !line.is_empty() && !line.starts_with(VTT_HEADER) && !CUE_INDEX_REGEX.is_match(line) {
            if let Some(cue) = current.as_mut() {
                if !cue.text.is_empty() {
                    cue.text.push('\n');
                }
                cue.text.push_str(line);
            }
        } else if line.is_empty() {
            if let Some(cue) = current.take() {
                if !cue.text.is_empty() {
                    cues.push(cue);
                }
            }
        }
    }

    if let Some(cue) = current {
        if !cue.text.is_empty() {
            cues.push(cue);
        }
    }

    cues
}

/// Serialize cues in the given order, renumbering from 1
pub fn serialize(cues: &[Cue]) -> String {
    let mut output = format!("{}\n\n", VTT_HEADER);
    for (index, cue) in cues.iter().enumerate() {
        output.push_str(&format!("{}\n", index + 1));
        output.push_str(&format!("{} {} {}\n", cue.start_time, TIMING_SEPARATOR, cue.end_time));
        output.push_str(&format!("{}\n\n", cue.text));
    }
    output
}

/// Order cues by start time; undisplayable cues sink to the end
pub fn sort_by_start(cues: &mut [Cue]) {
    cues.sort_by(|a, b| {
        let (a, b) = (a.start_seconds(), b.start_seconds());
        match (a.is_nan(), b.is_nan()) {
            (false, false) => a.total_cmp(&b),
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (true, true) => std::cmp::Ordering::Equal,
        }
    });
}

/// Convert `HH:MM:SS.mmm` to seconds.
///
/// Components are read like JavaScript's `parseInt`: leading digits count,
/// trailing junk is ignored, and a component with no digits yields NaN.
/// Missing milliseconds default to 0. No range validation is done.
pub fn timestamp_to_seconds(timestamp: &str) -> f64 {
    let parts: Vec<&str> = timestamp.split(':').collect();
    if parts.len() < 3 {
        return f64::NAN;
    }

    let mut seconds = parts[2].split('.');
    let whole_seconds = seconds.next().unwrap_or_default();
    let millis = match seconds.next() {
        Some(m) if !m.is_empty() => m,
        _ => "0",
    };

    parse_int_prefix(parts[0]) * 3600.0
        + parse_int_prefix(parts[1]) * 60.0
        + parse_int_prefix(whole_seconds)
        + parse_int_prefix(millis) / 1000.0
}

/// Format seconds as `HH:MM:SS.mmm`, wrapping at 24 hours
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).trunc() as u64 % 86_400_000
    } else {
        0
    };
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

fn parse_int_prefix(component: &str) -> f64 {
    let trimmed = component.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);

    match digits[..end].parse::<f64>() {
        Ok(value) if end > 0 => sign * value,
        _ => f64::NAN,
    }
}
