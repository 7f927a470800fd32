//! The rotated ordering clock: a 24-hour day anchored at 07:00.
//!
//! Orders placed after midnight belong to the previous evening's ordering
//! session, so earliest/latest comparisons and day bucketing run on a
//! linear minute scale that starts at 07:00 and ends at 06:59.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// Canonical order-timestamp form: `2025-02-12 11:58 PM`.
pub const ORDER_TIME_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// Parse a canonical order timestamp. Malformed input is `None`, never an error.
pub fn parse_order_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), ORDER_TIME_FORMAT).ok()
}

/// Map a wall-clock time to its offset in the rotated day.
///
/// 07:00 maps to 0 and 06:59 maps to 1439; times before 07:00 land at the
/// top of the range, after every same-session evening time.
pub fn rotated_minutes(t: NaiveTime) -> u32 {
    if t.hour() >= 7 {
        (t.hour() - 7) * 60 + t.minute()
    } else {
        (t.hour() + 17) * 60 + t.minute()
    }
}
