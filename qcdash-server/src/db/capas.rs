//! CAPA queries

use chrono::NaiveDate;
use qcdash_common::db::models::{Capa, CAPA_DEFAULT_PRIORITY, CAPA_STATUS_OPEN};
use qcdash_common::time;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Validated fields for a new CAPA
#[derive(Debug, Clone)]
pub struct NewCapa {
    pub project_id: String,
    pub capa_number: String,
    pub title: String,
    pub description: Option<String>,
    pub capa_type: String,
    /// Defaults to `open`
    pub status: Option<String>,
    /// Defaults to `medium`
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub created_by: String,
}

/// Partial update; `None` leaves the column unchanged, `Some(None)` clears
/// a nullable one
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapaChanges {
    pub capa_number: Option<String>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    #[serde(rename = "type")]
    pub capa_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub assigned_to: Option<Option<String>>,
}

pub async fn list_by_project(pool: &SqlitePool, project_id: &str) -> Result<Vec<Capa>, sqlx::Error> {
    sqlx::query_as::<_, Capa>("SELECT * FROM capas WHERE project_id = ? ORDER BY created_at DESC")
        .bind(project_id)
        .fetch_all(pool)
        .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Capa>, sqlx::Error> {
    sqlx::query_as::<_, Capa>("SELECT * FROM capas WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, new: NewCapa) -> Result<Capa, sqlx::Error> {
    let now = time::now();
    let capa = Capa {
        id: Uuid::new_v4().to_string(),
        project_id: new.project_id,
        capa_number: new.capa_number,
        title: new.title,
        description: new.description,
        capa_type: new.capa_type,
        status: new.status.unwrap_or_else(|| CAPA_STATUS_OPEN.to_string()),
        priority: new.priority.unwrap_or_else(|| CAPA_DEFAULT_PRIORITY.to_string()),
        due_date: new.due_date,
        assigned_to: new.assigned_to,
        created_by: new.created_by,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO capas (id, project_id, capa_number, title, description, type, status,
                           priority, due_date, assigned_to, created_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&capa.id)
    .bind(&capa.project_id)
    .bind(&capa.capa_number)
    .bind(&capa.title)
    .bind(&capa.description)
    .bind(&capa.capa_type)
    .bind(&capa.status)
    .bind(&capa.priority)
    .bind(capa.due_date)
    .bind(&capa.assigned_to)
    .bind(&capa.created_by)
    .bind(capa.created_at)
    .bind(capa.updated_at)
    .execute(pool)
    .await?;

    Ok(capa)
}

/// Apply `changes`; `Ok(None)` when no CAPA has `id`
pub async fn update(pool: &SqlitePool, id: &str, changes: CapaChanges) -> Result<Option<Capa>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE capas SET
            capa_number = COALESCE(?, capa_number),
            title = COALESCE(?, title),
            description = CASE WHEN ? THEN ? ELSE description END,
            type = COALESCE(?, type),
            status = COALESCE(?, status),
            priority = COALESCE(?, priority),
            due_date = CASE WHEN ? THEN ? ELSE due_date END,
            assigned_to = CASE WHEN ? THEN ? ELSE assigned_to END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.capa_number)
    .bind(changes.title)
    .bind(changes.description.is_some())
    .bind(changes.description.flatten())
    .bind(changes.capa_type)
    .bind(changes.status)
    .bind(changes.priority)
    .bind(changes.due_date.is_some())
    .bind(changes.due_date.flatten())
    .bind(changes.assigned_to.is_some())
    .bind(changes.assigned_to.flatten())
    .bind(time::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, id).await
}

/// `Ok(false)` when nothing was deleted
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM capas WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
