//! Compliance metric queries

use chrono::NaiveDate;
use qcdash_common::db::models::ComplianceMetric;
use qcdash_common::time;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewMetric {
    pub project_id: String,
    pub metric_type: String,
    pub value: f64,
    pub target_value: Option<f64>,
    pub unit: String,
    pub period: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricChanges {
    pub metric_type: Option<String>,
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub target_value: Option<Option<f64>>,
    pub unit: Option<String>,
    pub period: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Newest period first
pub async fn list_by_project(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<ComplianceMetric>, sqlx::Error> {
    sqlx::query_as::<_, ComplianceMetric>(
        "SELECT * FROM compliance_metrics WHERE project_id = ? ORDER BY date DESC, created_at DESC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<ComplianceMetric>, sqlx::Error> {
    sqlx::query_as::<_, ComplianceMetric>("SELECT * FROM compliance_metrics WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, new: NewMetric) -> Result<ComplianceMetric, sqlx::Error> {
    let now = time::now();
    let metric = ComplianceMetric {
        id: Uuid::new_v4().to_string(),
        project_id: new.project_id,
        metric_type: new.metric_type,
        value: new.value,
        target_value: new.target_value,
        unit: new.unit,
        period: new.period,
        date: new.date,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO compliance_metrics (id, project_id, metric_type, value, target_value,
                                        unit, period, date, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&metric.id)
    .bind(&metric.project_id)
    .bind(&metric.metric_type)
    .bind(metric.value)
    .bind(metric.target_value)
    .bind(&metric.unit)
    .bind(&metric.period)
    .bind(metric.date)
    .bind(metric.created_at)
    .bind(metric.updated_at)
    .execute(pool)
    .await?;

    Ok(metric)
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    changes: MetricChanges,
) -> Result<Option<ComplianceMetric>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE compliance_metrics SET
            metric_type = COALESCE(?, metric_type),
            value = COALESCE(?, value),
            target_value = CASE WHEN ? THEN ? ELSE target_value END,
            unit = COALESCE(?, unit),
            period = COALESCE(?, period),
            date = COALESCE(?, date),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.metric_type)
    .bind(changes.value)
    .bind(changes.target_value.is_some())
    .bind(changes.target_value.flatten())
    .bind(changes.unit)
    .bind(changes.period)
    .bind(changes.date)
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
    let result = sqlx::query("DELETE FROM compliance_metrics WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
