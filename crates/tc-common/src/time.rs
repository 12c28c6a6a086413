//! Time handling for bulletin observations.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::{TransformError, TransformResult};

/// Fixed timestamp layout used by the upstream bulletin decoder.
pub const BULLETIN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Reference/valid instant pair resolved from a feature's temporal fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimes {
    /// Forecast reference time (warning issue time)
    pub reference_time: DateTime<Utc>,
    /// Time the observation is valid for
    pub valid_time: DateTime<Utc>,
}

impl ResolvedTimes {
    /// Lead time in whole hours (valid minus reference, rounded).
    pub fn lead_hours(&self) -> i64 {
        let seconds = (self.valid_time - self.reference_time).num_seconds() as f64;
        (seconds / 3600.0).round() as i64
    }
}

/// Parse one timestamp in the fixed bulletin layout.
pub fn parse_bulletin_time(s: &str) -> TransformResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s, BULLETIN_TIME_FORMAT)
        .map_err(|e| TransformError::TimeParse(format!("'{}': {}", s, e)))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Render a timestamp in the fixed bulletin layout.
pub fn format_bulletin_time(t: DateTime<Utc>) -> String {
    t.format(BULLETIN_TIME_FORMAT).to_string()
}

/// Resolve the two time-encoding conventions the decoder may use.
///
/// `phenomenonTime` is either a `reference/valid` interval or a bare
/// reference instant whose valid time lives in `resultTime`.
pub fn resolve_times(phenomenon_time: &str, result_time: &str) -> TransformResult<ResolvedTimes> {
    let (reference, valid) = match phenomenon_time.split_once('/') {
        Some((r, v)) => (r, v),
        None => (phenomenon_time, result_time),
    };
    Ok(ResolvedTimes {
        reference_time: parse_bulletin_time(reference)?,
        valid_time: parse_bulletin_time(valid)?,
    })
}
