use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use movies_api::{
    catalog::load_catalog,
    create_router,
    services::{features::FeatureStrategy, similarity::IndexStrategy},
    AppState,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/movies.csv");

fn create_test_server_with(features: FeatureStrategy, index: IndexStrategy) -> TestServer {
    let catalog = load_catalog(FIXTURE).unwrap();
    let state = AppState::from_catalog(Arc::new(catalog), features, index, 5).unwrap();
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(FeatureStrategy::Categorical, IndexStrategy::NearestNeighbor)
}

fn titles(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_header_is_set() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_recommend_sequel_first() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations/Toy%20Story")
        .add_query_param("k", 1)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "Toy Story");
    assert_eq!(titles(&body), vec!["Toy Story 2"]);
}

#[tokio::test]
async fn test_recommend_uses_default_k() {
    let server = create_test_server();
    let response = server.get("/api/v1/recommendations/Heat").await;

    response.assert_status_ok();
    let recommended = titles(&response.json());
    assert_eq!(recommended.len(), 5);
    assert!(!recommended.contains(&"Heat".to_string()));
    // Casino shares Crime and Drama with Heat
    assert_eq!(recommended[0], "Casino");
}

#[tokio::test]
async fn test_recommend_large_k_returns_all_candidates() {
    for index in [IndexStrategy::Pairwise, IndexStrategy::NearestNeighbor] {
        let server = create_test_server_with(FeatureStrategy::Categorical, index);
        let response = server
            .get("/api/v1/recommendations/Heat")
            .add_query_param("k", 50)
            .await;

        response.assert_status_ok();
        assert_eq!(titles(&response.json()).len(), 6);
    }
}

#[tokio::test]
async fn test_recommend_huge_k_returns_all_candidates() {
    for index in [IndexStrategy::Pairwise, IndexStrategy::NearestNeighbor] {
        let server = create_test_server_with(FeatureStrategy::Categorical, index);
        let response = server
            .get("/api/v1/recommendations/Heat")
            .add_query_param("k", 1_000_000_000_000_i64)
            .await;

        response.assert_status_ok();
        assert_eq!(titles(&response.json()).len(), 6);
    }
}

#[tokio::test]
async fn test_recommend_zero_k() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations/Heat")
        .add_query_param("k", 0)
        .await;

    response.assert_status_ok();
    assert!(titles(&response.json()).is_empty());
}

#[tokio::test]
async fn test_recommend_negative_k_is_bad_request() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations/Heat")
        .add_query_param("k", -1)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_unknown_title_is_not_found() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations/Unknown%20Title%20XYZ")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Unknown Title XYZ"));
}

#[tokio::test]
async fn test_text_strategy_excludes_movies_without_genres() {
    let server = create_test_server_with(FeatureStrategy::Text, IndexStrategy::Pairwise);

    let response = server.get("/api/v1/recommendations/Untitled%20Reel").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .get("/api/v1/recommendations/Heat")
        .add_query_param("k", 50)
        .await;
    response.assert_status_ok();
    let recommended = titles(&response.json());
    assert_eq!(recommended.len(), 5);
    assert!(!recommended.contains(&"Untitled Reel".to_string()));
}

#[tokio::test]
async fn test_movies_in_month() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/month/octubre").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["month"], "October");
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_invalid_month_is_bad_request() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/month/13").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movies_on_weekday() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/weekday/viernes").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["day"], "Friday");
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_movies_in_country() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/country/France").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_franchise() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/franchises/Toy%20Story%20Collection")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["total_revenue"], 870_920_902.0);
    assert_eq!(body["average_revenue"], 435_460_451.0);
}

#[tokio::test]
async fn test_unknown_franchise_is_not_found() {
    let server = create_test_server();
    let response = server.get("/api/v1/franchises/Nope%20Collection").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_production_company() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/companies/Pixar%20Animation%20Studios")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["total_revenue"], 870_920_902.0);
}

#[tokio::test]
async fn test_movie_return() {
    let server = create_test_server();
    let response = server.get("/api/v1/returns/Amelie").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["budget"], 10_000_000.0);
    assert_eq!(body["revenue"], 33_225_499.0);
    assert_eq!(body["year"], 2001);
    assert!((body["return"].as_f64().unwrap() - 3.3225499).abs() < 1e-9);
}
