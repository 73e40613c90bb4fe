use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::models::{
    AvailabilityWindow, CreateAvailabilityWindow, SchedulingConfig, UpsertSchedulingConfig,
};
use crate::db::repository::{AvailabilityRepository, SchedulingConfigRepository};
use crate::error::{AppError, AppResult};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/:professional_id", get(get_windows).put(replace_windows))
        .route("/:professional_id/config", get(get_config).put(put_config))
}

async fn get_windows(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
) -> AppResult<Json<Vec<AvailabilityWindow>>> {
    let windows = AvailabilityRepository::list_by_professional(&state.db, &professional_id).await?;
    Ok(Json(windows))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceWindowsRequest {
    pub windows: Vec<CreateAvailabilityWindow>,
}

/// The configuration UI submits the full weekly grid; the previous one is
/// replaced wholesale.
async fn replace_windows(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
    Json(req): Json<ReplaceWindowsRequest>,
) -> AppResult<Json<Vec<AvailabilityWindow>>> {
    let mut errors = Vec::new();
    for (i, window) in req.windows.iter().enumerate() {
        if window.day_of_week > 6 {
            errors.push(format!("window {}: day_of_week must be 0-6", i));
        }
        if window.start_time >= window.end_time {
            errors.push(format!("window {}: start_time must be before end_time", i));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let windows =
        AvailabilityRepository::replace_all(&state.db, &professional_id, &req.windows).await?;
    Ok(Json(windows))
}

async fn get_config(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
) -> AppResult<Json<SchedulingConfig>> {
    let config = SchedulingConfigRepository::get(&state.db, &professional_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no scheduling config for professional {}",
                professional_id
            ))
        })?;
    Ok(Json(config))
}

async fn put_config(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
    Json(input): Json<UpsertSchedulingConfig>,
) -> AppResult<Json<SchedulingConfig>> {
    let mut errors = Vec::new();
    if !(15..=240).contains(&input.lesson_duration_minutes) {
        errors.push("lesson_duration_minutes must be between 15 and 240".to_string());
    }
    if input.gap_minutes > 60 {
        errors.push("gap_minutes must be between 0 and 60".to_string());
    }
    if let Some(tz) = &input.timezone {
        if tz.trim().is_empty() {
            errors.push("timezone must not be blank".to_string());
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let config = SchedulingConfigRepository::upsert(&state.db, &professional_id, &input).await?;
    Ok(Json(config))
}
