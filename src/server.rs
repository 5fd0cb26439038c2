//! HTTP API surface.
//!
//! Routes (JSON in/out, FastAPI-compatible error body `{"detail": "..."}`):
//!
//! | Route          | Method | Purpose                               |
//! |----------------|--------|---------------------------------------|
//! | `/`            | GET    | health + service state                |
//! | `/associate`   | GET    | nearest neighbors to a word           |
//! | `/analogy`     | POST   | vector-arithmetic analogy             |
//! | `/similarity`  | GET    | pairwise cosine similarity            |
//! | `/vocab/check` | GET    | vocabulary membership                 |
//! | `/vocab/info`  | GET    | vocabulary size and dimensionality    |
//!
//! Error mapping: `VocabularyMiss` → 404, `InvalidArgument` → 400,
//! `ModelUnavailable` → 503.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use anyhow::Result;

use crate::config::RensoConfig;
use crate::error::QueryError;
use crate::service::{EmbeddingService, ScoredWord, VocabInfo};

/// Upper bound on `topn` accepted over HTTP. The core itself only rejects 0.
const MAX_TOPN: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EmbeddingService>,
    pub config: Arc<RensoConfig>,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = match &self {
            QueryError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            QueryError::VocabularyMiss { .. } => StatusCode::NOT_FOUND,
            QueryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

// ── Request / response records ────────────────────────────────────────────────

#[derive(Serialize)]
struct RootResponse {
    message: String,
    model: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Deserialize)]
struct AssociateParams {
    word: String,
    #[serde(default = "default_topn")]
    topn: usize,
}

#[derive(Serialize)]
struct AssociationResponse {
    query: String,
    results: Vec<ScoredWord>,
    count: usize,
}

#[derive(Deserialize)]
struct AnalogySeed {
    #[serde(default)]
    positive: Vec<String>,
    #[serde(default)]
    negative: Vec<String>,
    #[serde(default = "default_topn")]
    topn: usize,
}

#[derive(Serialize)]
struct AnalogyResponse {
    positive: Vec<String>,
    negative: Vec<String>,
    results: Vec<ScoredWord>,
    count: usize,
}

#[derive(Deserialize)]
struct SimilarityParams {
    word1: String,
    word2: String,
}

#[derive(Serialize)]
struct SimilarityResponse {
    word1: String,
    word2: String,
    similarity: f64,
}

#[derive(Deserialize)]
struct VocabCheckParams {
    word: String,
}

#[derive(Serialize)]
struct VocabCheckResponse {
    word: String,
    exists: bool,
}

fn default_topn() -> usize {
    10
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/associate", get(associate))
        .route("/analogy", post(analogy))
        .route("/similarity", get(similarity))
        .route("/vocab/check", get(vocab_check))
        .route("/vocab/info", get(vocab_info))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Load the model and serve HTTP until ctrl-c.
///
/// A failed load does not abort startup: the service comes up in the
/// `LoadFailed` state, `/` reports the reason, and query routes return 503.
pub async fn serve(config: RensoConfig) -> Result<()> {
    let model_path = config.resolved_model_path();
    // Model files run to gigabytes; keep the runtime responsive while parsing.
    let service = tokio::task::spawn_blocking(move || EmbeddingService::load(&model_path)).await?;

    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config.clone()),
    };
    let router = build_router(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "API server listening at http://{bind_addr}/");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down API server");
        })
        .await?;

    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} is running", state.config.api.title),
        model: state.config.model.path.clone(),
        status: state.service.state().label(),
        detail: state.service.load_failure().map(str::to_string),
    })
}

async fn associate(
    State(state): State<AppState>,
    Query(params): Query<AssociateParams>,
) -> Result<Json<AssociationResponse>, QueryError> {
    check_topn(params.topn)?;
    let results = state.service.most_similar(&params.word, params.topn)?;
    Ok(Json(AssociationResponse {
        query: params.word,
        count: results.len(),
        results,
    }))
}

async fn analogy(
    State(state): State<AppState>,
    Json(seed): Json<AnalogySeed>,
) -> Result<Json<AnalogyResponse>, QueryError> {
    check_topn(seed.topn)?;
    let results = state
        .service
        .analogy(&seed.positive, &seed.negative, seed.topn)?;
    Ok(Json(AnalogyResponse {
        positive: seed.positive,
        negative: seed.negative,
        count: results.len(),
        results,
    }))
}

async fn similarity(
    State(state): State<AppState>,
    Query(params): Query<SimilarityParams>,
) -> Result<Json<SimilarityResponse>, QueryError> {
    let similarity = state.service.similarity(&params.word1, &params.word2)?;
    Ok(Json(SimilarityResponse {
        word1: params.word1,
        word2: params.word2,
        similarity,
    }))
}

async fn vocab_check(
    State(state): State<AppState>,
    Query(params): Query<VocabCheckParams>,
) -> Json<VocabCheckResponse> {
    let exists = state.service.contains(&params.word);
    Json(VocabCheckResponse {
        word: params.word,
        exists,
    })
}

async fn vocab_info(State(state): State<AppState>) -> Result<Json<VocabInfo>, QueryError> {
    Ok(Json(state.service.vocab_info()?))
}

fn check_topn(topn: usize) -> Result<(), QueryError> {
    if !(1..=MAX_TOPN).contains(&topn) {
        return Err(QueryError::InvalidArgument(format!(
            "topn must be between 1 and {MAX_TOPN}, got {topn}"
        )));
    }
    Ok(())
}
