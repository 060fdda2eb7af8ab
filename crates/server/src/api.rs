use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::state::AppState;

// ── Query endpoint ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
    pub sources: Vec<String>,
    pub retrieved_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn processing_error(detail: impl std::fmt::Display) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: format!("Processing error: {detail}"),
        }),
    )
}

pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ErrorBody>)> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(bad_request("Query cannot be empty"));
    }

    let hits = state.retriever.retrieve(text).await.map_err(|e| {
        error!("retrieval failed: {e}");
        processing_error(e)
    })?;

    let advice = state.advisor.advise(text, &hits).await.map_err(|e| {
        error!("advice failed: {e}");
        processing_error(e)
    })?;

    info!(
        retrieved = advice.retrieved_count,
        sources = advice.sources.len(),
        "query answered"
    );

    Ok(Json(QueryResponse {
        response: advice.response,
        sources: advice.sources,
        retrieved_count: advice.retrieved_count,
    }))
}

// ── Health ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub index_ready: bool,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        index_ready: state.manifest.chunk_count > 0,
    })
}

// ── Stats ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub chunk_count: usize,
    pub dimensions: usize,
    pub embedding_model: String,
    pub top_k: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let cache = state.retriever.cache_stats().await;
    Json(StatsResponse {
        chunk_count: state.manifest.chunk_count,
        dimensions: state.manifest.dimensions,
        embedding_model: state.manifest.model.clone(),
        top_k: state.retriever.top_k(),
        cache_hits: cache.hits,
        cache_misses: cache.misses,
        cache_hit_rate: cache.hit_rate(),
    })
}
