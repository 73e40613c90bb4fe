use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::db::models::{Client, CreateClient};
use crate::db::repository::ClientRepository;
use crate::error::{AppError, AppResult};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route("/:id", get(get_client))
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub professional_id: String,
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation(vec![
            "name must not be blank".to_string(),
        ]));
    }

    let client = ClientRepository::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<Vec<Client>>> {
    let clients = ClientRepository::list_by_professional(&state.db, &query.professional_id).await?;
    Ok(Json(clients))
}

async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<Client>> {
    let client = ClientRepository::find_by_id(&state.db, &id)
        .await?
        .filter(|c| c.professional_id == query.professional_id)
        .ok_or_else(|| AppError::NotFound(format!("client {} not found", id)))?;
    Ok(Json(client))
}
