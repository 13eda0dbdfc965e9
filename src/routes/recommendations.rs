use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::RecommendationResponse,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    k: Option<i64>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(title): Path<String>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let k = match params.k {
        None => state.default_recommendations,
        Some(k) => usize::try_from(k)
            .map_err(|_| AppError::InvalidInput(format!("k must not be negative, got {}", k)))?,
    };

    tracing::info!(request_id = %request_id, title = %title, k, "Processing recommendation request");

    let recommendations = state.recommender.recommend(&title, k)?;

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        "Recommendations served"
    );

    Ok(Json(RecommendationResponse {
        title,
        recommendations,
    }))
}
