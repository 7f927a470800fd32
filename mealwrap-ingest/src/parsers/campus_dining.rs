//! Campus dining pickup-confirmation receipts.
//!
//! Expected visible text after HTML stripping:
//!   Duke University Dining
//!   Transaction #8675309
//!   2025-02-12 11:58 PM
//!   Target: West Union
//!   The Skillet
//!   1.  Cheeseburger
//!   2.  Fries
//!   Total $12.50

use std::sync::OnceLock;

use mealwrap_core::{Receipt, ReceiptItem};
use regex::Regex;

/// All three must be present for the text to count as a receipt at all.
/// Deliberate false-negative bias: skipping a malformed message beats
/// emitting a bogus record.
const REQUIRED_MARKERS: [&str; 3] = ["Target:", "Duke University", "Transaction #"];

/// Marker the pickup time and restaurant name are anchored to.
const PICKUP_MARKER: &str = "Target:";

/// Order-status lines that can sit between the pickup marker and the
/// restaurant name.
const STATUS_WORDS: [&str; 4] = ["completed", "cancelled", "ready", "started"];

fn transaction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#(\d{5,})").expect("invalid transaction regex"))
}

fn order_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d{4}-\d{2}-\d{2} \d{1,2}:\d{2} [AP]M").expect("invalid order time regex")
    })
}

fn clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}:\d{2} [AP]M").expect("invalid clock regex"))
}

fn bare_clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}:\d{2} [AP]M$").expect("invalid bare clock regex"))
}

fn item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+(?P<name>.*)$").expect("invalid item regex"))
}

fn total_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)total:?\s*\$?(\d+(?:\.\d{1,2})?)").expect("invalid total regex")
    })
}

/// Extract a receipt from HTML-stripped message text, or `None` when the
/// required markers are missing.
///
/// Field extraction is independent: a missing or malformed optional field
/// never blocks the others.
pub fn parse_campus_dining_text(text: &str) -> Option<Receipt> {
    if !REQUIRED_MARKERS.iter().all(|m| text.contains(m)) {
        return None;
    }

    let transaction_id = transaction_re()
        .captures(text)
        .map(|caps| caps[1].to_string());

    let order_time = order_time_re().find(text).map(|m| m.as_str().to_string());

    // Pickup time and restaurant name are scoped to the first marker onward.
    let after_marker = text.find(PICKUP_MARKER).map(|i| &text[i..]);
    let pickup_time = after_marker
        .and_then(|t| clock_re().find(t))
        .map(|m| m.as_str().to_string());
    let restaurant_name = after_marker.and_then(restaurant_after_marker);

    let mut items = Vec::new();
    for line in text.lines() {
        if let Some(caps) = item_re().captures(line) {
            let name = caps["name"].trim();
            if !name.is_empty() {
                items.push(ReceiptItem {
                    name: name.to_string(),
                });
            }
        }
    }

    // A non-numeric amount leaves the field absent, never fails extraction.
    let total = total_re()
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok());

    Some(Receipt {
        transaction_id,
        order_time,
        pickup_time,
        restaurant_name,
        items,
        total,
    })
}

/// First line after the marker line that reads like a venue name rather
/// than an order status or a bare time-of-day.
fn restaurant_after_marker(after_marker: &str) -> Option<String> {
    for line in after_marker.lines().skip(1) {
        let line = line.trim();
        if line.len() <= 2 {
            continue;
        }
        if STATUS_WORDS.contains(&line.to_ascii_lowercase().as_str()) {
            continue;
        }
        if bare_clock_re().is_match(line) {
            continue;
        }
        return Some(line.to_string());
    }
    None
}
