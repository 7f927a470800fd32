//! Receipt-format parsers.
//!
//! Each vendor layout gets its own module with a recognition gate; new
//! layouts plug in here without touching the aggregator.

pub mod campus_dining;

use mealwrap_core::Receipt;

/// Try every known receipt format in order; `None` means the text is not a
/// recognizable receipt and the message is excluded from aggregation.
pub fn parse_receipt_text(text: &str) -> Option<Receipt> {
    campus_dining::parse_campus_dining_text(text)
}
