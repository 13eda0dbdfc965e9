use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CompanySummary, CountryCount, FranchiseSummary, MonthCount, ReturnSummary, WeekdayCount},
    routes::AppState,
};

/// Movies released in a month, across all years
pub async fn movies_in_month(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
) -> AppResult<Json<MonthCount>> {
    Ok(Json(state.analytics.movies_in_month(&month)?))
}

/// Movies released on a weekday, across all years
pub async fn movies_on_weekday(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
) -> AppResult<Json<WeekdayCount>> {
    Ok(Json(state.analytics.movies_on_weekday(&day)?))
}

/// Movies produced in a country
pub async fn movies_in_country(
    State(state): State<Arc<AppState>>,
    Path(country): Path<String>,
) -> AppResult<Json<CountryCount>> {
    Ok(Json(state.analytics.movies_in_country(&country)?))
}

/// Count and revenue of a franchise
pub async fn franchise(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> AppResult<Json<FranchiseSummary>> {
    Ok(Json(state.analytics.franchise(&name)?))
}

/// Count and revenue of a production company
pub async fn production_company(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> AppResult<Json<CompanySummary>> {
    Ok(Json(state.analytics.production_company(&name)?))
}

/// Investment and return of a single title
pub async fn movie_return(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> AppResult<Json<ReturnSummary>> {
    Ok(Json(state.analytics.movie_return(&title)?))
}
