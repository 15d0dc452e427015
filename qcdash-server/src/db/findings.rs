//! Audit finding queries
//!
//! Findings hang off an audit rather than a project.

use chrono::NaiveDate;
use qcdash_common::db::models::{AuditFinding, FINDING_DEFAULT_STATUS};
use qcdash_common::time;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewFinding {
    pub audit_id: String,
    pub finding_type: String,
    pub severity: String,
    pub title: String,
    pub description: String,
    pub requirement: Option<String>,
    pub corrective_action: Option<String>,
    /// Defaults to `open`
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindingChanges {
    pub finding_type: Option<String>,
    pub severity: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub requirement: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub corrective_action: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub assigned_to: Option<Option<String>>,
}

pub async fn list_by_audit(pool: &SqlitePool, audit_id: &str) -> Result<Vec<AuditFinding>, sqlx::Error> {
    sqlx::query_as::<_, AuditFinding>(
        "SELECT * FROM audit_findings WHERE audit_id = ? ORDER BY created_at ASC",
    )
    .bind(audit_id)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<AuditFinding>, sqlx::Error> {
    sqlx::query_as::<_, AuditFinding>("SELECT * FROM audit_findings WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, new: NewFinding) -> Result<AuditFinding, sqlx::Error> {
    let now = time::now();
    let finding = AuditFinding {
        id: Uuid::new_v4().to_string(),
        audit_id: new.audit_id,
        finding_type: new.finding_type,
        severity: new.severity,
        title: new.title,
        description: new.description,
        requirement: new.requirement,
        corrective_action: new.corrective_action,
        status: new.status.unwrap_or_else(|| FINDING_DEFAULT_STATUS.to_string()),
        due_date: new.due_date,
        assigned_to: new.assigned_to,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO audit_findings (id, audit_id, finding_type, severity, title, description,
                                    requirement, corrective_action, status, due_date, assigned_to,
                                    created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&finding.id)
    .bind(&finding.audit_id)
    .bind(&finding.finding_type)
    .bind(&finding.severity)
    .bind(&finding.title)
    .bind(&finding.description)
    .bind(&finding.requirement)
    .bind(&finding.corrective_action)
    .bind(&finding.status)
    .bind(finding.due_date)
    .bind(&finding.assigned_to)
    .bind(finding.created_at)
    .bind(finding.updated_at)
    .execute(pool)
    .await?;

    Ok(finding)
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    changes: FindingChanges,
) -> Result<Option<AuditFinding>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE audit_findings SET
            finding_type = COALESCE(?, finding_type),
            severity = COALESCE(?, severity),
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            requirement = CASE WHEN ? THEN ? ELSE requirement END,
            corrective_action = CASE WHEN ? THEN ? ELSE corrective_action END,
            status = COALESCE(?, status),
            due_date = CASE WHEN ? THEN ? ELSE due_date END,
            assigned_to = CASE WHEN ? THEN ? ELSE assigned_to END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.finding_type)
    .bind(changes.severity)
    .bind(changes.title)
    .bind(changes.description)
    .bind(changes.requirement.is_some())
    .bind(changes.requirement.flatten())
    .bind(changes.corrective_action.is_some())
    .bind(changes.corrective_action.flatten())
    .bind(changes.status)
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

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM audit_findings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
