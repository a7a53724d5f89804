use crate::analytics;
use crate::store::Store;
use crate::validate::validate_date;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/analytics", get(analytics_handler))
        .with_state(state)
}

#[derive(Deserialize)]
struct AnalyticsParams {
    date: Option<String>,
}

async fn analytics_handler(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Response {
    let today = Local::now().date_naive();
    let date = match validate_date(params.date.as_deref(), today) {
        Ok(date) => date,
        Err(err) => {
            tracing::warn!("rejected analytics request: {err}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    match analytics::run_analytics(&state.store, date).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            tracing::error!("analytics failed for {date}: {err:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
