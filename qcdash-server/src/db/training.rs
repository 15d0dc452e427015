//! Training record queries

use chrono::NaiveDate;
use qcdash_common::db::models::{TrainingRecord, TRAINING_DEFAULT_STATUS};
use qcdash_common::time;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewTrainingRecord {
    pub project_id: String,
    pub user_id: String,
    pub training_name: String,
    pub training_type: String,
    /// Defaults to `pending`
    pub status: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub score: Option<f64>,
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingChanges {
    pub user_id: Option<String>,
    pub training_name: Option<String>,
    pub training_type: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub completion_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub score: Option<Option<f64>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub certificate_url: Option<Option<String>>,
}

pub async fn list_by_project(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<TrainingRecord>, sqlx::Error> {
    sqlx::query_as::<_, TrainingRecord>(
        "SELECT * FROM training_records WHERE project_id = ? ORDER BY created_at DESC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<TrainingRecord>, sqlx::Error> {
    sqlx::query_as::<_, TrainingRecord>("SELECT * FROM training_records WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, new: NewTrainingRecord) -> Result<TrainingRecord, sqlx::Error> {
    let now = time::now();
    let record = TrainingRecord {
        id: Uuid::new_v4().to_string(),
        project_id: new.project_id,
        user_id: new.user_id,
        training_name: new.training_name,
        training_type: new.training_type,
        status: new.status.unwrap_or_else(|| TRAINING_DEFAULT_STATUS.to_string()),
        completion_date: new.completion_date,
        due_date: new.due_date,
        score: new.score,
        certificate_url: new.certificate_url,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO training_records (id, project_id, user_id, training_name, training_type, status,
                                      completion_date, due_date, score, certificate_url,
                                      created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.project_id)
    .bind(&record.user_id)
    .bind(&record.training_name)
    .bind(&record.training_type)
    .bind(&record.status)
    .bind(record.completion_date)
    .bind(record.due_date)
    .bind(record.score)
    .bind(&record.certificate_url)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(record)
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    changes: TrainingChanges,
) -> Result<Option<TrainingRecord>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE training_records SET
            user_id = COALESCE(?, user_id),
            training_name = COALESCE(?, training_name),
            training_type = COALESCE(?, training_type),
            status = COALESCE(?, status),
            completion_date = CASE WHEN ? THEN ? ELSE completion_date END,
            due_date = CASE WHEN ? THEN ? ELSE due_date END,
            score = CASE WHEN ? THEN ? ELSE score END,
            certificate_url = CASE WHEN ? THEN ? ELSE certificate_url END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.user_id)
    .bind(changes.training_name)
    .bind(changes.training_type)
    .bind(changes.status)
    .bind(changes.completion_date.is_some())
    .bind(changes.completion_date.flatten())
    .bind(changes.due_date.is_some())
    .bind(changes.due_date.flatten())
    .bind(changes.score.is_some())
    .bind(changes.score.flatten())
    .bind(changes.certificate_url.is_some())
    .bind(changes.certificate_url.flatten())
    .bind(time::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM training_records WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
