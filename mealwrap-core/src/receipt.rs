//! Receipt records extracted from order-confirmation emails.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::time::parse_order_time;

/// One ordered line item. Quantity is always 1; duplicate names are kept
/// as separate entries in extraction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
}

/// Normalized extraction result for one message body.
///
/// Only constructed when the body carries every required receipt marker;
/// all other fields are best-effort and independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// First numeric transaction id of 5+ digits found in the body.
    pub transaction_id: Option<String>,
    /// Literal first `YYYY-MM-DD H:MM AM/PM` match, not reformatted.
    pub order_time: Option<String>,
    /// `H:MM AM/PM` found at or after the pickup-location marker.
    pub pickup_time: Option<String>,
    pub restaurant_name: Option<String>,
    pub items: Vec<ReceiptItem>,
    pub total: Option<f64>,
}

impl Receipt {
    /// Parse the stored order time, if it is present and well-formed.
    pub fn order_datetime(&self) -> Option<NaiveDateTime> {
        self.order_time.as_deref().and_then(parse_order_time)
    }
}

/// A receipt together with the name of the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptAttachment {
    pub filename: String,
    #[serde(rename = "parsed_receipt")]
    pub receipt: Receipt,
}

/// One ingested message: derived recipient name, subject, and its receipts.
///
/// An archive entry could in principle carry several receipts; in practice
/// each entry wraps exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub subject: Option<String>,
    pub recipient_name: Option<String>,
    pub attachments: Vec<ReceiptAttachment>,
}

/// Snapshot taken when a receipt sets a new maximum order total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostExpensiveOrder {
    pub filename: String,
    pub total: f64,
    pub transaction_id: Option<String>,
    pub order_time: Option<String>,
    pub items: Vec<ReceiptItem>,
}
