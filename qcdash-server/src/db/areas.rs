//! Compliance area queries

use chrono::NaiveDate;
use qcdash_common::db::models::ComplianceArea;
use qcdash_common::time;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewArea {
    pub project_id: String,
    pub area_name: String,
    pub description: Option<String>,
    pub score: f64,
    pub max_score: f64,
    pub last_assessment: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaChanges {
    pub area_name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub last_assessment: Option<Option<NaiveDate>>,
}

/// Alphabetical by area name
pub async fn list_by_project(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<ComplianceArea>, sqlx::Error> {
    sqlx::query_as::<_, ComplianceArea>(
        "SELECT * FROM compliance_areas WHERE project_id = ? ORDER BY area_name ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<ComplianceArea>, sqlx::Error> {
    sqlx::query_as::<_, ComplianceArea>("SELECT * FROM compliance_areas WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, new: NewArea) -> Result<ComplianceArea, sqlx::Error> {
    let now = time::now();
    let area = ComplianceArea {
        id: Uuid::new_v4().to_string(),
        project_id: new.project_id,
        area_name: new.area_name,
        description: new.description,
        score: new.score,
        max_score: new.max_score,
        last_assessment: new.last_assessment,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO compliance_areas (id, project_id, area_name, description, score, max_score,
                                      last_assessment, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&area.id)
    .bind(&area.project_id)
    .bind(&area.area_name)
    .bind(&area.description)
    .bind(area.score)
    .bind(area.max_score)
    .bind(area.last_assessment)
    .bind(area.created_at)
    .bind(area.updated_at)
    .execute(pool)
    .await?;

    Ok(area)
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    changes: AreaChanges,
) -> Result<Option<ComplianceArea>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE compliance_areas SET
            area_name = COALESCE(?, area_name),
            description = CASE WHEN ? THEN ? ELSE description END,
            score = COALESCE(?, score),
            max_score = COALESCE(?, max_score),
            last_assessment = CASE WHEN ? THEN ? ELSE last_assessment END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.area_name)
    .bind(changes.description.is_some())
    .bind(changes.description.flatten())
    .bind(changes.score)
    .bind(changes.max_score)
    .bind(changes.last_assessment.is_some())
    .bind(changes.last_assessment.flatten())
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
    let result = sqlx::query("DELETE FROM compliance_areas WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
