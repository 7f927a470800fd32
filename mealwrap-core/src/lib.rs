//! mealwrap-core: receipt records, the rotated ordering clock, and batch statistics.

pub mod receipt;
pub mod stats;
pub mod time;

pub use receipt::{EmailEntry, MostExpensiveOrder, Receipt, ReceiptAttachment, ReceiptItem};
pub use stats::{
    BusiestDay, ItemCount, OrderStats, RestaurantCount, TopRestaurant, aggregate_receipts,
};
pub use time::{parse_order_time, rotated_minutes};
