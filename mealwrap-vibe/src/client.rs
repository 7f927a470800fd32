//! Gemini text-generation client.
//!
//! The client is constructed once at the process boundary and passed in
//! wherever a vibe is generated; there is no process-wide handle.

use anyhow::{Context, Result, bail};
use mealwrap_core::OrderStats;
use serde::{Deserialize, Serialize};

use crate::prompt::{build_prompt, redact_stats};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_TEMPERATURE: f32 = 1.1;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// One prompt in, the first candidate's text out.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Part {
            text: String,
        }

        #[derive(Serialize)]
        struct Content {
            parts: Vec<Part>,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct GenerationConfig {
            temperature: f32,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Req {
            contents: Vec<Content>,
            generation_config: GenerationConfig,
        }

        #[derive(Deserialize)]
        struct Resp {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: RespContent,
        }

        #[derive(Deserialize)]
        struct RespContent {
            #[serde(default)]
            parts: Vec<RespPart>,
        }

        #[derive(Deserialize)]
        struct RespPart {
            text: Option<String>,
        }

        let body = Req {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let url = format!("{API_BASE}/models/{}:generateContent", self.model);
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("gemini error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse gemini response")?;
        let mut s = String::new();
        if let Some(candidate) = out.candidates.first() {
            for part in &candidate.content.parts {
                if let Some(text) = &part.text {
                    s.push_str(text);
                }
            }
        }
        Ok(s.trim().to_string())
    }
}

/// The service's reply: the roast sentence plus whatever color mapping the
/// model chose. `colors` is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeReply {
    #[serde(default)]
    pub sentence: Option<String>,
    #[serde(default)]
    pub colors: Option<serde_json::Value>,
}

/// Strip an optional ```json fence and parse the reply body. A non-JSON
/// reply is a generation error; the stats that produced it stay valid.
pub fn parse_vibe_reply(raw: &str) -> Result<VibeReply> {
    let cleaned = raw.trim();
    let cleaned = cleaned.strip_prefix("```json").unwrap_or(cleaned);
    let cleaned = cleaned.strip_prefix("```").unwrap_or(cleaned);
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned);
    serde_json::from_str(cleaned.trim()).context("gemini reply was not valid JSON")
}

/// Redact, prompt, generate, parse.
pub async fn request_vibe(client: &GeminiClient, stats: &OrderStats) -> Result<VibeReply> {
    let payload = redact_stats(stats);
    let prompt = build_prompt(&payload)?;
    let raw = client.generate(&prompt).await?;
    parse_vibe_reply(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_reply() {
        let raw = "```json\n{\"sentence\": \"You're a burger loyalist.\", \
                   \"colors\": {\"primary\": \"#ff8800\"}}\n```";
        let reply = parse_vibe_reply(raw).unwrap();
        assert_eq!(reply.sentence.as_deref(), Some("You're a burger loyalist."));
        assert_eq!(
            reply.colors.unwrap()["primary"],
            serde_json::json!("#ff8800")
        );
    }

    #[test]
    fn test_parse_unfenced_reply() {
        let reply = parse_vibe_reply("{\"sentence\": \"You're a creature of habit.\"}").unwrap();
        assert_eq!(
            reply.sentence.as_deref(),
            Some("You're a creature of habit.")
        );
        assert!(reply.colors.is_none());
    }

    #[test]
    fn test_non_json_reply_is_an_error() {
        assert!(parse_vibe_reply("You're a burger loyalist.").is_err());
        assert!(parse_vibe_reply("").is_err());
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let reply = parse_vibe_reply("{}").unwrap();
        assert!(reply.sentence.is_none());
        assert!(reply.colors.is_none());
    }
}
