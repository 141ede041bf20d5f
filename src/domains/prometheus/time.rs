//! Relative time expressions such as `5m`, `2h` or `1w`.
//!
//! An expression is an unsigned integer immediately followed by one unit
//! letter: `s`, `m`, `h`, `d` or `w`. Nothing else is accepted.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use thiserror::Error;

const SECOND_MS: u64 = 1_000;
const MINUTE_MS: u64 = 60 * SECOND_MS;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;
const WEEK_MS: u64 = 7 * DAY_MS;

/// The string did not match `<integer><s|m|h|d|w>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time expression '{0}': expected an integer followed by s, m, h, d or w (e.g. 5m, 1h, 7d)")]
pub struct InvalidTimeExpression(pub String);

/// Milliseconds per unit letter.
fn unit_millis(unit: char) -> Option<u64> {
    match unit {
        's' => Some(SECOND_MS),
        'm' => Some(MINUTE_MS),
        'h' => Some(HOUR_MS),
        'd' => Some(DAY_MS),
        'w' => Some(WEEK_MS),
        _ => None,
    }
}

/// Parse a relative expression into a duration.
pub fn parse_duration(expr: &str) -> Result<Duration, InvalidTimeExpression> {
    let invalid = || InvalidTimeExpression(expr.to_string());

    let unit = expr.chars().last().ok_or_else(invalid)?;
    let digits = &expr[..expr.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let multiplier = unit_millis(unit).ok_or_else(invalid)?;
    let count: u64 = digits.parse().map_err(|_| invalid())?;
    let millis = count.checked_mul(multiplier).ok_or_else(invalid)?;

    Ok(Duration::from_millis(millis))
}

/// Evaluation step for a range query looking back over `lookback`.
///
/// Coarsens as the window widens so responses stay bounded.
pub fn step_for_lookback(lookback: Duration) -> &'static str {
    let millis = lookback.as_millis();
    if millis <= u128::from(DAY_MS) {
        "1m"
    } else if millis <= u128::from(WEEK_MS) {
        "5m"
    } else {
        "15m"
    }
}

/// The instant `expr` before `now`.
pub fn lookback_start(
    now: DateTime<Utc>,
    expr: &str,
) -> Result<DateTime<Utc>, InvalidTimeExpression> {
    let lookback = parse_duration(expr)?;
    let delta = TimeDelta::from_std(lookback).map_err(|_| InvalidTimeExpression(expr.to_string()))?;
    now.checked_sub_signed(delta)
        .ok_or_else(|| InvalidTimeExpression(expr.to_string()))
}

/// Render an instant the way it is sent to Prometheus.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a Unix timestamp in milliseconds, `None` when out of range.
pub fn format_unix_millis(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(format_instant)
}

/// Render a Unix timestamp in (fractional) seconds as returned in samples.
pub fn format_unix_seconds(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    format_unix_millis((seconds * 1000.0).round() as i64)
}
