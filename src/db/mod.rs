pub mod models;
pub mod repository;

pub use models::*;
pub use repository::*;

#[cfg(test)]
pub(crate) mod test_util {
    use std::str::FromStr;

    use chrono::Utc;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use uuid::Uuid;

    /// Fresh in-memory database with the full schema applied.
    pub async fn memory_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    pub async fn seed_client(pool: &SqlitePool, professional_id: &str, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();
        sqlx::query(
            "INSERT INTO clients (id, professional_id, name, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(professional_id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    pub async fn seed_config(
        pool: &SqlitePool,
        professional_id: &str,
        duration_minutes: i64,
        gap_minutes: i64,
    ) {
        let now = Utc::now().naive_utc();
        sqlx::query(
            "INSERT INTO scheduling_configs \
             (professional_id, lesson_duration_minutes, gap_minutes, timezone, created_at, updated_at) \
             VALUES (?, ?, ?, 'America/Sao_Paulo', ?, ?)",
        )
        .bind(professional_id)
        .bind(duration_minutes)
        .bind(gap_minutes)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
    }

    pub async fn seed_window(
        pool: &SqlitePool,
        professional_id: &str,
        day_of_week: i64,
        start: &str,
        end: &str,
    ) {
        let now = Utc::now().naive_utc();
        sqlx::query(
            "INSERT INTO availability_windows \
             (id, professional_id, day_of_week, start_time, end_time, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(professional_id)
        .bind(day_of_week)
        .bind(start)
        .bind(end)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
    }
}
