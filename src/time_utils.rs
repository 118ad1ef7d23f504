// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and timestamp-derived ids.

use chrono::{DateTime, SecondsFormat, Utc};

/// Number of trailing millisecond digits kept in a workout id.
pub const WORKOUT_ID_DIGITS: usize = 10;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Workout id for a creation instant: the last ten digits of the
/// millisecond epoch, as text.
pub fn workout_id_at(date: DateTime<Utc>) -> String {
    let millis = date.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(WORKOUT_ID_DIGITS);
    millis[start..].to_string()
}

/// "April 14" style month/day label (UTC calendar).
pub fn month_day(date: DateTime<Utc>) -> String {
    date.format("%B %-d").to_string()
}
