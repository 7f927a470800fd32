//! mealwrap-vibe: turn batch statistics into a one-sentence LLM-written vibe.

pub mod client;
pub mod prompt;

pub use client::{GeminiClient, VibeReply, parse_vibe_reply, request_vibe};
pub use prompt::{VibePayload, build_prompt, redact_stats};
