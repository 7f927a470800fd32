//! Batch statistics: fold extracted receipts into one summary.
//!
//! Aggregation is a pure fold over the entry sequence. Every ranking and
//! tie-break is deterministic for a fixed input order: counters keep
//! first-seen key order, maxima are tracked with strict comparisons, and
//! the ranking sort is stable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::receipt::{EmailEntry, MostExpensiveOrder, Receipt};
use crate::time::rotated_minutes;

/// Insertion-ordered counter table with an explicit get-or-zero accessor.
/// First-seen key order is what makes ties resolve to the earliest key.
#[derive(Debug, Default)]
struct CountTable<K> {
    entries: Vec<(K, u32)>,
}

impl<K: PartialEq + Clone> CountTable<K> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn increment(&mut self, key: &K) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key.clone(), 1)),
        }
    }

    /// First entry holding the maximum count (strict comparison, so the
    /// earliest-seen key wins ties). Empty table is `None`.
    fn max_entry(&self) -> Option<(&K, u32)> {
        let mut best: Option<(&K, u32)> = None;
        for (key, count) in &self.entries {
            if best.is_none_or(|(_, c)| *count > c) {
                best = Some((key, *count));
            }
        }
        best
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn total(&self) -> u32 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries sorted by descending count; the sort is stable, so ties keep
    /// first-seen order.
    fn ranked(self) -> Vec<(K, u32)> {
        let mut ranked = self.entries;
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// One row of the item ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCount {
    pub item: String,
    pub count: u32,
}

/// One row of the restaurant ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantCount {
    pub name: String,
    pub count: u32,
}

/// The calendar date with the most orders. `date` is `None` when no receipt
/// carried a parseable order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusiestDay {
    pub date: Option<NaiveDate>,
    pub order_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRestaurant {
    pub name: Option<String>,
    pub count: u32,
}

/// Complete aggregate output for one uploaded batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStats {
    pub recipient_name: Option<String>,
    pub item_counts: Vec<ItemCount>,
    pub most_expensive_order: Option<MostExpensiveOrder>,
    pub total_items_ordered: u32,
    pub total_unique_items: usize,
    pub busiest_day: BusiestDay,
    pub busiest_day_orders: Vec<Receipt>,
    pub restaurant_counts: Vec<RestaurantCount>,
    pub unique_restaurants: usize,
    pub top_restaurant: TopRestaurant,
    pub earliest_order_by_time: Option<Receipt>,
    pub latest_order_by_time: Option<Receipt>,
}

/// Fold a batch of entries into its statistics summary.
///
/// Never mutates its input; an empty batch yields the all-zero summary.
pub fn aggregate_receipts(entries: &[EmailEntry]) -> OrderStats {
    let mut item_counts: CountTable<String> = CountTable::new();
    let mut restaurant_counts: CountTable<String> = CountTable::new();
    let mut date_counts: CountTable<NaiveDate> = CountTable::new();

    let mut max_total = 0.0_f64;
    let mut most_expensive: Option<MostExpensiveOrder> = None;

    let mut earliest: Option<Receipt> = None;
    let mut latest: Option<Receipt> = None;
    let mut earliest_rot: u32 = 1440;
    let mut latest_rot: i64 = -1;

    for entry in entries {
        for att in &entry.attachments {
            let receipt = &att.receipt;

            // Order times: day buckets plus earliest/latest in the rotated day.
            // Unparseable timestamps are skipped, not fatal.
            if let Some(dt) = receipt.order_datetime() {
                let rot = rotated_minutes(dt.time());
                date_counts.increment(&dt.date());
                if rot < earliest_rot {
                    earliest_rot = rot;
                    earliest = Some(receipt.clone());
                }
                if i64::from(rot) > latest_rot {
                    latest_rot = i64::from(rot);
                    latest = Some(receipt.clone());
                }
            }

            // Item frequencies; quantity is always 1 per extracted line.
            for item in &receipt.items {
                item_counts.increment(&item.name);
            }

            // Most expensive order: strictly greater replaces, ties keep the
            // earlier receipt.
            if let Some(total) = receipt.total {
                if total > max_total {
                    max_total = total;
                    most_expensive = Some(MostExpensiveOrder {
                        filename: att.filename.clone(),
                        total,
                        transaction_id: receipt.transaction_id.clone(),
                        order_time: receipt.order_time.clone(),
                        items: receipt.items.clone(),
                    });
                }
            }

            if let Some(name) = &receipt.restaurant_name {
                restaurant_counts.increment(name);
            }
        }
    }

    let busiest_day = match date_counts.max_entry() {
        Some((date, count)) => BusiestDay {
            date: Some(*date),
            order_count: count,
        },
        None => BusiestDay {
            date: None,
            order_count: 0,
        },
    };

    // Second pass: every receipt dated on the busiest day, in encounter order.
    let mut busiest_day_orders = Vec::new();
    if let Some(busiest_date) = busiest_day.date {
        for entry in entries {
            for att in &entry.attachments {
                if let Some(dt) = att.receipt.order_datetime() {
                    if dt.date() == busiest_date {
                        busiest_day_orders.push(att.receipt.clone());
                    }
                }
            }
        }
    }

    let top_restaurant = match restaurant_counts.max_entry() {
        Some((name, count)) => TopRestaurant {
            name: Some(name.clone()),
            count,
        },
        None => TopRestaurant {
            name: None,
            count: 0,
        },
    };

    let recipient_name = entries.iter().find_map(|e| e.recipient_name.clone());

    let total_items_ordered = item_counts.total();
    let total_unique_items = item_counts.len();
    let unique_restaurants = restaurant_counts.len();

    OrderStats {
        recipient_name,
        item_counts: item_counts
            .ranked()
            .into_iter()
            .map(|(item, count)| ItemCount { item, count })
            .collect(),
        most_expensive_order: most_expensive,
        total_items_ordered,
        total_unique_items,
        busiest_day,
        busiest_day_orders,
        restaurant_counts: restaurant_counts
            .ranked()
            .into_iter()
            .map(|(name, count)| RestaurantCount { name, count })
            .collect(),
        unique_restaurants,
        top_restaurant,
        earliest_order_by_time: earliest,
        latest_order_by_time: latest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::{ReceiptAttachment, ReceiptItem};

    fn receipt(
        order_time: Option<&str>,
        items: &[&str],
        total: Option<f64>,
        restaurant: Option<&str>,
    ) -> Receipt {
        Receipt {
            transaction_id: Some("1234567".to_string()),
            order_time: order_time.map(str::to_string),
            pickup_time: None,
            restaurant_name: restaurant.map(str::to_string),
            items: items
                .iter()
                .map(|name| ReceiptItem {
                    name: name.to_string(),
                })
                .collect(),
            total,
        }
    }

    fn entry(filename: &str, receipt: Receipt) -> EmailEntry {
        EmailEntry {
            subject: Some("Your order".to_string()),
            recipient_name: None,
            attachments: vec![ReceiptAttachment {
                filename: filename.to_string(),
                receipt,
            }],
        }
    }

    #[test]
    fn test_empty_batch_yields_zero_summary() {
        let stats = aggregate_receipts(&[]);
        assert!(stats.item_counts.is_empty());
        assert_eq!(stats.total_unique_items, 0);
        assert_eq!(stats.total_items_ordered, 0);
        assert_eq!(stats.busiest_day.date, None);
        assert_eq!(stats.busiest_day.order_count, 0);
        assert!(stats.busiest_day_orders.is_empty());
        assert_eq!(stats.top_restaurant.name, None);
        assert_eq!(stats.top_restaurant.count, 0);
        assert!(stats.most_expensive_order.is_none());
        assert!(stats.earliest_order_by_time.is_none());
        assert!(stats.latest_order_by_time.is_none());
        assert!(stats.recipient_name.is_none());
    }

    #[test]
    fn test_item_ranking_and_totals() {
        let entries = vec![
            entry("a.eml", receipt(None, &["Burger", "Fries"], None, None)),
            entry("b.eml", receipt(None, &["Burger"], None, None)),
        ];
        let stats = aggregate_receipts(&entries);
        assert_eq!(
            stats.item_counts,
            vec![
                ItemCount {
                    item: "Burger".to_string(),
                    count: 2
                },
                ItemCount {
                    item: "Fries".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(stats.total_unique_items, 2);
        assert_eq!(stats.total_items_ordered, 3);
    }

    #[test]
    fn test_item_ranking_tie_keeps_first_seen_order() {
        let entries = vec![entry(
            "a.eml",
            receipt(None, &["Pad Thai", "Dumplings"], None, None),
        )];
        let stats = aggregate_receipts(&entries);
        assert_eq!(stats.item_counts[0].item, "Pad Thai");
        assert_eq!(stats.item_counts[1].item, "Dumplings");
    }

    #[test]
    fn test_most_expensive_tie_keeps_first() {
        let entries = vec![
            entry("first.eml", receipt(None, &["Ramen"], Some(12.50), None)),
            entry("second.eml", receipt(None, &["Sushi"], Some(12.50), None)),
        ];
        let stats = aggregate_receipts(&entries);
        let top = stats.most_expensive_order.unwrap();
        assert_eq!(top.filename, "first.eml");
        assert_eq!(top.total, 12.50);
        assert_eq!(top.items[0].name, "Ramen");
    }

    #[test]
    fn test_most_expensive_strictly_greater_replaces() {
        let entries = vec![
            entry("a.eml", receipt(None, &[], Some(8.0), None)),
            entry("b.eml", receipt(None, &[], Some(19.25), None)),
            entry("c.eml", receipt(None, &[], Some(4.0), None)),
        ];
        let stats = aggregate_receipts(&entries);
        assert_eq!(stats.most_expensive_order.unwrap().filename, "b.eml");
    }

    #[test]
    fn test_post_midnight_order_is_latest_in_session() {
        // 11:58 PM and 12:05 AM the next calendar date are the same
        // 07:00-anchored session; 8:00 AM two days on is a fresh one.
        let entries = vec![
            entry(
                "a.eml",
                receipt(Some("2025-02-12 11:58 PM"), &[], None, None),
            ),
            entry(
                "b.eml",
                receipt(Some("2025-02-13 12:05 AM"), &[], None, None),
            ),
            entry("c.eml", receipt(Some("2025-02-14 8:00 AM"), &[], None, None)),
        ];
        let stats = aggregate_receipts(&entries);
        let latest = stats.latest_order_by_time.unwrap();
        assert_eq!(latest.order_time.as_deref(), Some("2025-02-13 12:05 AM"));
        let earliest = stats.earliest_order_by_time.unwrap();
        assert_eq!(earliest.order_time.as_deref(), Some("2025-02-14 8:00 AM"));
    }

    #[test]
    fn test_busiest_day_and_its_orders() {
        let entries = vec![
            entry(
                "a.eml",
                receipt(Some("2025-02-12 11:58 PM"), &["Tacos"], None, None),
            ),
            entry(
                "b.eml",
                receipt(Some("2025-02-12 6:10 PM"), &["Bowl"], None, None),
            ),
            entry(
                "c.eml",
                receipt(Some("2025-02-14 8:00 AM"), &["Bagel"], None, None),
            ),
        ];
        let stats = aggregate_receipts(&entries);
        assert_eq!(
            stats.busiest_day.date,
            Some(chrono::NaiveDate::from_ymd_opt(2025, 2, 12).unwrap())
        );
        assert_eq!(stats.busiest_day.order_count, 2);
        assert_eq!(stats.busiest_day_orders.len(), 2);
        assert_eq!(
            stats.busiest_day_orders[0].order_time.as_deref(),
            Some("2025-02-12 11:58 PM")
        );
    }

    #[test]
    fn test_busiest_day_tie_keeps_first_encountered_date() {
        let entries = vec![
            entry("a.eml", receipt(Some("2025-03-01 1:00 PM"), &[], None, None)),
            entry("b.eml", receipt(Some("2025-03-02 1:00 PM"), &[], None, None)),
        ];
        let stats = aggregate_receipts(&entries);
        assert_eq!(
            stats.busiest_day.date,
            Some(chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert_eq!(stats.busiest_day.order_count, 1);
    }

    #[test]
    fn test_top_restaurant_tie_keeps_first_encountered() {
        let entries = vec![
            entry("a.eml", receipt(None, &[], None, Some("The Skillet"))),
            entry("b.eml", receipt(None, &[], None, Some("Il Forno"))),
        ];
        let stats = aggregate_receipts(&entries);
        assert_eq!(stats.top_restaurant.name.as_deref(), Some("The Skillet"));
        assert_eq!(stats.top_restaurant.count, 1);
        assert_eq!(stats.unique_restaurants, 2);
    }

    #[test]
    fn test_unparseable_order_time_is_skipped_not_fatal() {
        let entries = vec![entry(
            "a.eml",
            receipt(Some("not a timestamp"), &["Wrap"], Some(6.0), None),
        )];
        let stats = aggregate_receipts(&entries);
        assert_eq!(stats.busiest_day.date, None);
        assert!(stats.earliest_order_by_time.is_none());
        // The rest of the receipt still aggregates.
        assert_eq!(stats.total_items_ordered, 1);
        assert!(stats.most_expensive_order.is_some());
    }

    #[test]
    fn test_recipient_name_takes_first_present() {
        let mut first = entry("a.eml", receipt(None, &[], None, None));
        first.recipient_name = None;
        let mut second = entry("b.eml", receipt(None, &[], None, None));
        second.recipient_name = Some("Jane Doe".to_string());
        let stats = aggregate_receipts(&[first, second]);
        assert_eq!(stats.recipient_name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_summary_serializes_with_backend_keys() {
        let stats = aggregate_receipts(&[entry(
            "a.eml",
            receipt(Some("2025-02-12 6:10 PM"), &["Bowl"], Some(9.0), Some("Gyotaku")),
        )]);
        let json = serde_json::to_value(&stats).unwrap();
        for key in [
            "recipient_name",
            "item_counts",
            "most_expensive_order",
            "total_items_ordered",
            "total_unique_items",
            "busiest_day",
            "busiest_day_orders",
            "restaurant_counts",
            "unique_restaurants",
            "top_restaurant",
            "earliest_order_by_time",
            "latest_order_by_time",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["busiest_day"]["date"], "2025-02-12");
    }
}
