//! Compliance document metadata queries
//!
//! File bytes live in [`crate::storage`]; these rows only describe them.

use qcdash_common::db::models::{ComplianceDocument, DOCUMENT_DEFAULT_STATUS};
use qcdash_common::time;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub project_id: String,
    pub document_name: String,
    pub document_type: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_by: String,
    pub category: Option<String>,
    pub version: Option<String>,
}

pub async fn list_by_project(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<ComplianceDocument>, sqlx::Error> {
    sqlx::query_as::<_, ComplianceDocument>(
        "SELECT * FROM compliance_documents WHERE project_id = ? ORDER BY created_at DESC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn count_by_project(pool: &SqlitePool, project_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM compliance_documents WHERE project_id = ?")
        .bind(project_id)
        .fetch_one(pool)
        .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<ComplianceDocument>, sqlx::Error> {
    sqlx::query_as::<_, ComplianceDocument>("SELECT * FROM compliance_documents WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, new: NewDocument) -> Result<ComplianceDocument, sqlx::Error> {
    let now = time::now();
    let document = ComplianceDocument {
        id: Uuid::new_v4().to_string(),
        project_id: new.project_id,
        document_name: new.document_name,
        document_type: new.document_type,
        file_url: new.file_url,
        file_size: new.file_size,
        mime_type: new.mime_type,
        uploaded_by: new.uploaded_by,
        category: new.category,
        version: new.version,
        status: DOCUMENT_DEFAULT_STATUS.to_string(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO compliance_documents (id, project_id, document_name, document_type, file_url,
                                          file_size, mime_type, uploaded_by, category, version,
                                          status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&document.id)
    .bind(&document.project_id)
    .bind(&document.document_name)
    .bind(&document.document_type)
    .bind(&document.file_url)
    .bind(document.file_size)
    .bind(&document.mime_type)
    .bind(&document.uploaded_by)
    .bind(&document.category)
    .bind(&document.version)
    .bind(&document.status)
    .bind(document.created_at)
    .bind(document.updated_at)
    .execute(pool)
    .await?;

    Ok(document)
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM compliance_documents WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
