//! Audit queries

use chrono::NaiveDate;
use qcdash_common::db::models::{Audit, AUDIT_DEFAULT_STATUS};
use qcdash_common::time;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewAudit {
    pub project_id: String,
    pub audit_number: String,
    pub area: String,
    pub audit_type: String,
    /// Defaults to `planned`
    pub status: Option<String>,
    pub auditor: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Defaults to 0
    pub findings_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditChanges {
    pub audit_number: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "type")]
    pub audit_type: Option<String>,
    pub status: Option<String>,
    pub auditor: Option<String>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    pub findings_count: Option<i64>,
}

/// Most recent audit first
pub async fn list_by_project(pool: &SqlitePool, project_id: &str) -> Result<Vec<Audit>, sqlx::Error> {
    sqlx::query_as::<_, Audit>(
        "SELECT * FROM audits WHERE project_id = ? ORDER BY start_date DESC, created_at DESC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Audit>, sqlx::Error> {
    sqlx::query_as::<_, Audit>("SELECT * FROM audits WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, new: NewAudit) -> Result<Audit, sqlx::Error> {
    let now = time::now();
    let audit = Audit {
        id: Uuid::new_v4().to_string(),
        project_id: new.project_id,
        audit_number: new.audit_number,
        area: new.area,
        audit_type: new.audit_type,
        status: new.status.unwrap_or_else(|| AUDIT_DEFAULT_STATUS.to_string()),
        auditor: new.auditor,
        start_date: new.start_date,
        end_date: new.end_date,
        findings_count: new.findings_count.unwrap_or(0),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO audits (id, project_id, audit_number, area, type, status, auditor,
                            start_date, end_date, findings_count, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&audit.id)
    .bind(&audit.project_id)
    .bind(&audit.audit_number)
    .bind(&audit.area)
    .bind(&audit.audit_type)
    .bind(&audit.status)
    .bind(&audit.auditor)
    .bind(audit.start_date)
    .bind(audit.end_date)
    .bind(audit.findings_count)
    .bind(audit.created_at)
    .bind(audit.updated_at)
    .execute(pool)
    .await?;

    Ok(audit)
}

pub async fn update(pool: &SqlitePool, id: &str, changes: AuditChanges) -> Result<Option<Audit>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE audits SET
            audit_number = COALESCE(?, audit_number),
            area = COALESCE(?, area),
            type = COALESCE(?, type),
            status = COALESCE(?, status),
            auditor = COALESCE(?, auditor),
            start_date = COALESCE(?, start_date),
            end_date = CASE WHEN ? THEN ? ELSE end_date END,
            findings_count = COALESCE(?, findings_count),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.audit_number)
    .bind(changes.area)
    .bind(changes.audit_type)
    .bind(changes.status)
    .bind(changes.auditor)
    .bind(changes.start_date)
    .bind(changes.end_date.is_some())
    .bind(changes.end_date.flatten())
    .bind(changes.findings_count)
    .bind(time::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, id).await
}

/// Deleting an audit cascades to its findings
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM audits WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
