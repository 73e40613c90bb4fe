use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::agenda::{AgendaService, DaySchedule};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/slots", get(day_slots))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub professional_id: String,
    pub date: NaiveDate,
}

/// Bookable-slot grid for one day. The upstream auth layer guarantees the
/// professional id; this handler trusts it.
async fn day_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<DaySchedule>> {
    let now = Utc::now().naive_utc();
    let schedule =
        AgendaService::day_schedule(&state.db, &query.professional_id, query.date, now).await?;
    Ok(Json(schedule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::db::test_util::{memory_pool, seed_config, seed_window};

    async fn test_app() -> Router {
        let pool = memory_pool().await;
        seed_config(&pool, "prof-1", 60, 0).await;
        // Monday 08:00-12:00.
        seed_window(&pool, "prof-1", 0, "08:00:00", "12:00:00").await;
        let state = Arc::new(AppState {
            db: pool,
            config: Config::default(),
        });
        Router::new().nest("/api/agenda", router()).with_state(state)
    }

    #[tokio::test]
    async fn slots_endpoint_returns_the_day_grid() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/agenda/slots?professional_id=prof-1&date=2025-03-03")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["works_today"], true);
        assert_eq!(json["slots"].as_array().unwrap().len(), 4);
        assert_eq!(json["slots"][0]["status"], "free");
    }

    #[tokio::test]
    async fn non_working_day_reports_works_today_false() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/agenda/slots?professional_id=prof-1&date=2025-03-04")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["works_today"], false);
        assert!(json["slots"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_professional_is_not_found() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/agenda/slots?professional_id=ghost&date=2025-03-03")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
