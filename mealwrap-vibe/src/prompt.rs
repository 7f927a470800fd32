//! Prompt assembly: redact and truncate the stats before anything leaves
//! the process.

use anyhow::Result;
use mealwrap_core::OrderStats;
use serde::Serialize;

/// Rankings are cut to this many rows before being sent out.
pub const TOP_N: usize = 5;

/// Compact payload forwarded to the text-generation service. Timestamps,
/// transaction ids, and the recipient name never appear here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VibePayload {
    pub top_items: Vec<String>,
    pub top_restaurants: Vec<String>,
    pub total_items_ordered: u32,
    pub total_unique_items: usize,
    pub top_restaurant: Option<String>,
}

/// Reduce a full summary to the prompt payload.
pub fn redact_stats(stats: &OrderStats) -> VibePayload {
    VibePayload {
        top_items: stats
            .item_counts
            .iter()
            .take(TOP_N)
            .map(|row| row.item.clone())
            .collect(),
        top_restaurants: stats
            .restaurant_counts
            .iter()
            .take(TOP_N)
            .map(|row| row.name.clone())
            .collect(),
        total_items_ordered: stats.total_items_ordered,
        total_unique_items: stats.total_unique_items,
        top_restaurant: stats.top_restaurant.name.clone(),
    }
}

/// The fixed roast instruction followed by the serialized payload.
pub fn build_prompt(payload: &VibePayload) -> Result<String> {
    let stats_json = serde_json::to_string(payload)?;
    Ok(format!(
        "You are a savage Gen-Z roast writer for a college dining app. \
         Roast the user in ONE sentence. Start EXACTLY with: \"You're a...\" \
         Respond ONLY as JSON with fields `sentence` and `colors`.\n\n{stats_json}"
    ))
}
