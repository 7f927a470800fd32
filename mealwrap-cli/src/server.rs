//! HTTP API mirroring the frontend's upload/vibe contract.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/upload_emls` | Analyze a multipart batch of `.eml`/`.zip` uploads |
//! | `POST` | `/api/generate-vibe` | Turn a stats payload into a one-sentence vibe |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Error responses are JSON bodies shaped `{ "error": "..." }`. All origins
//! are permitted so a browser frontend can call the API directly.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use mealwrap_core::{OrderStats, aggregate_receipts};
use mealwrap_ingest::ingest_upload;
use mealwrap_vibe::{GeminiClient, request_vibe};

use crate::config::Config;

/// Shared state: the text-generation client, constructed once at startup.
/// `None` when no API key is configured; the vibe route then reports a
/// configuration error instead of calling out.
#[derive(Clone)]
struct AppState {
    client: Option<Arc<GeminiClient>>,
}

pub async fn run_server(bind: &str, config: &Config) -> anyhow::Result<()> {
    let client = std::env::var("GOOGLE_API_KEY").ok().map(|key| {
        Arc::new(
            GeminiClient::new(key)
                .with_model(config.llm.model.clone())
                .with_temperature(config.llm.temperature),
        )
    });
    if client.is_none() {
        warn!("GOOGLE_API_KEY not set; /api/generate-vibe will return errors");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/upload_emls", post(handle_upload))
        .route("/api/generate-vibe", post(handle_vibe))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { client });

    info!("listening on http://{bind}");
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

async fn handle_upload(mut multipart: Multipart) -> Result<Json<OrderStats>, AppError> {
    let mut entries = Vec::new();
    let mut saw_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        saw_file = true;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("reading upload {filename}: {e}")))?;
        ingest_upload(&filename, &bytes, &mut entries)
            .map_err(|e| bad_request(e.to_string()))?;
    }

    if !saw_file {
        return Err(bad_request("No files uploaded."));
    }
    if entries.is_empty() {
        return Err(bad_request("No valid .eml files found."));
    }

    Ok(Json(aggregate_receipts(&entries)))
}

#[derive(Deserialize)]
struct VibeRequest {
    stats: Option<OrderStats>,
}

#[derive(Serialize)]
struct VibeResponse {
    vibe: Option<String>,
    colors: Option<serde_json::Value>,
}

async fn handle_vibe(
    State(state): State<AppState>,
    Json(req): Json<VibeRequest>,
) -> Result<Json<VibeResponse>, AppError> {
    let Some(stats) = req.stats else {
        return Err(bad_request("Missing stats payload"));
    };
    let Some(client) = &state.client else {
        return Err(internal("text generation is not configured"));
    };

    match request_vibe(client, &stats).await {
        Ok(reply) => Ok(Json(VibeResponse {
            vibe: reply.sentence,
            colors: reply.colors,
        })),
        Err(e) => Err(internal(e.to_string())),
    }
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }))
}
