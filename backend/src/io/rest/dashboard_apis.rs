use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{Local, NaiveDate};
use log::info;
use serde::Deserialize;

use super::error::error_response;
use crate::AppState;

// Query parameters for the dashboard API; defaults to the salon's today
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<NaiveDate>,
}

pub async fn get_overview(State(state): State<AppState>, Query(query): Query<DashboardQuery>) -> impl IntoResponse {
    info!("GET /api/admin/dashboard - query: {:?}", query);
    let today = query.date.unwrap_or_else(|| Local::now().date_naive());
    match state.dashboard.overview(today).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => error_response("build dashboard", e),
    }
}
