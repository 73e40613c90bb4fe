use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::db::models::{Booking, CreateBooking, UpdateBooking};
use crate::db::repository::BookingRepository;
use crate::error::AppResult;
use crate::services::booking::BookingService;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/:id", get(get_booking).put(update_booking))
        .route("/:id/cancel", post(cancel_booking))
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub professional_id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub tag_id: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateBookingRequest> for CreateBooking {
    fn from(req: CreateBookingRequest) -> Self {
        CreateBooking {
            professional_id: req.professional_id,
            client_id: req.client_id,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            tag_id: req.tag_id,
            notes: req.notes,
            series_id: None,
            is_recurring: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub professional_id: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub professional_id: String,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = BookingService::create_booking(&state.db, req.into()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = BookingRepository::list_by_professional_and_date_range(
        &state.db,
        &query.professional_id,
        query.from,
        query.to,
    )
    .await?;
    Ok(Json(bookings))
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<Booking>> {
    let booking = BookingService::get_booking(&state.db, &id, &query.professional_id).await?;
    Ok(Json(booking))
}

async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
    Json(update): Json<UpdateBooking>,
) -> AppResult<Json<Booking>> {
    let booking =
        BookingService::update_booking(&state.db, &id, &query.professional_id, update).await?;
    Ok(Json(booking))
}

async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<Booking>> {
    let booking = BookingService::cancel_booking(&state.db, &id, &query.professional_id).await?;
    Ok(Json(booking))
}
