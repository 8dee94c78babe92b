use axum::{extract::State, Json};
use std::sync::Arc;

use super::dto::*;
use super::error::ApiError;
use super::state::AppState;

/// GET / - Liveness banner
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Video tutor API is running",
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /chat - Explain a message in steps and attach a video
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let reply = state.tutor.respond(&req.message).await?;
    Ok(Json(reply.into()))
}

/// GET /random-video - Most viewed video for a random trending query
pub async fn random_video(State(state): State<Arc<AppState>>) -> Json<VideoFields> {
    Json(state.tutor.random_video().await.into())
}
