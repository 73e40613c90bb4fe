use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::db::models::{CreateSeries, SeriesSummary};
use crate::error::AppResult;
use crate::services::series::SeriesService;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_series).get(list_series))
        .route("/:id/cancel", post(cancel_series))
}

/// Create a recurrence rule and bulk-generate its bookings. Occurrences
/// that collide with existing appointments are skipped, which is reported
/// in the counts rather than as an error.
async fn create_series(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateSeries>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let result = SeriesService::create_series(&state.db, input).await?;

    let message = format!(
        "{} appointments created, {} skipped due to conflicts",
        result.total_generated, result.total_skipped
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "series_id": result.series_id,
            "total_requested": result.total_requested,
            "total_generated": result.total_generated,
            "total_skipped": result.total_skipped,
            "message": message,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub professional_id: String,
}

async fn list_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<Vec<SeriesSummary>>> {
    let series = SeriesService::list_active_series(&state.db, &query.professional_id).await?;
    Ok(Json(series))
}

#[derive(Debug, Deserialize)]
pub struct CancelSeriesRequest {
    pub professional_id: String,
    /// When true, bookings before today survive the cancellation.
    #[serde(default)]
    pub future_only: bool,
}

async fn cancel_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CancelSeriesRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let today = Utc::now().date_naive();
    let result = SeriesService::cancel_series(
        &state.db,
        &id,
        &req.professional_id,
        req.future_only,
        today,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "series_id": result.series_id,
        "total_cancelled": result.total_cancelled,
    })))
}
