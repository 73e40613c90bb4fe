use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{Client, CreateClient};
use crate::error::{AppError, AppResult};

const CLIENT_COLUMNS: &str =
    "id, professional_id, name, email, phone, notes, created_at, updated_at";

/// Repository for client records (`clients` table).
pub struct ClientRepository;

impl ClientRepository {
    pub async fn create(pool: &SqlitePool, create: CreateClient) -> AppResult<Client> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients (id, professional_id, name, email, phone, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(&id)
        .bind(&create.professional_id)
        .bind(&create.name)
        .bind(&create.email)
        .bind(&create.phone)
        .bind(&create.notes)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Client>> {
        let row = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn list_by_professional(
        pool: &SqlitePool,
        professional_id: &str,
    ) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE professional_id = ? ORDER BY name"
        ))
        .bind(professional_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }
}
