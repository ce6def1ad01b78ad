use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    model::artifact::FORMAT_VERSION,
    models::{ModelInfo, RecommendationResponse},
    services::voice::{IntentEnvelope, VoiceResponse, GENERIC_ERROR},
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    #[serde(alias = "item_name")]
    pub movie_name: String,
    pub k: Option<usize>,
    #[serde(default)]
    pub include_scores: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommends titles similar to `movie_name`
pub async fn recommend(
    State(state): State<AppState>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(params) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let movie_name = params.movie_name.trim();
    if movie_name.is_empty() {
        return Err(AppError::InvalidInput(
            "movie_name must not be empty".to_string(),
        ));
    }

    let recommendations = state.engine.recommend(&state.model, movie_name, params.k)?;

    tracing::info!(
        movie_name = %movie_name,
        k = params.k.unwrap_or(state.engine.default_k()),
        returned = recommendations.len(),
        "Served recommendations"
    );

    let scores = params
        .include_scores
        .then(|| recommendations.iter().map(|r| r.score).collect());

    Ok(Json(RecommendationResponse {
        recommended_items: recommendations.into_iter().map(|r| r.title).collect(),
        scores,
    }))
}

/// Describes the loaded model version
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(ModelInfo {
        items: state.model.len(),
        vocabulary_size: state.model.vocabulary.len(),
        built_at: state.model.built_at,
        format_version: FORMAT_VERSION,
    })
}

/// Voice-assistant intent endpoint; always answers with speech
pub async fn voice(
    State(state): State<AppState>,
    envelope: Result<Json<IntentEnvelope>, JsonRejection>,
) -> Json<VoiceResponse> {
    match envelope {
        Ok(Json(envelope)) => Json(state.voice.handle(envelope).await),
        Err(e) => {
            tracing::warn!(error = %e, "Malformed voice request");
            Json(VoiceResponse::speak(GENERIC_ERROR, true))
        }
    }
}
