use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    catalog::{load_catalog, CatalogStore},
    config::Config,
    error::AppResult,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        features::FeatureStrategy, similarity::IndexStrategy, AnalyticsService,
        RecommendationService,
    },
};

pub mod analytics;
pub mod recommendations;

/// Shared application state, built once before the server starts
pub struct AppState {
    pub analytics: AnalyticsService,
    pub recommender: RecommendationService,
    /// Recommendation count used when a request does not pass `k`
    pub default_recommendations: usize,
}

impl AppState {
    /// Loads the catalog named in the config and builds every service over it
    pub fn build(config: &Config) -> AppResult<Self> {
        let catalog = load_catalog(&config.catalog_path)?;
        Self::from_catalog(
            Arc::new(catalog),
            config.feature_strategy,
            config.index_strategy,
            config.default_recommendations,
        )
    }

    /// Builds every service over an already loaded catalog
    pub fn from_catalog(
        catalog: Arc<dyn CatalogStore>,
        features: FeatureStrategy,
        index: IndexStrategy,
        default_recommendations: usize,
    ) -> AppResult<Self> {
        let recommender = RecommendationService::build(catalog.clone(), features, index)?;

        Ok(Self {
            analytics: AnalyticsService::new(catalog),
            recommender,
            default_recommendations,
        })
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies/month/:month", get(analytics::movies_in_month))
        .route("/movies/weekday/:day", get(analytics::movies_on_weekday))
        .route("/movies/country/:country", get(analytics::movies_in_country))
        .route("/franchises/:name", get(analytics::franchise))
        .route("/companies/:name", get(analytics::production_company))
        .route("/returns/:title", get(analytics::movie_return))
        .route("/recommendations/:title", get(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
