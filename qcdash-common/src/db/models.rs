//! Database models
//!
//! One struct per table. Every record except [`AuditFinding`] carries a
//! `project_id`; findings are scoped through their parent audit.
//!
//! All models deserialize leniently: a missing field takes its default and
//! numeric fields read by the KPI aggregator also accept `null` as zero, so
//! partial records still produce a renderable dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Metric type holding the headline compliance rate
pub const METRIC_OVERALL_COMPLIANCE: &str = "overall_compliance";

/// CAPA lifecycle entry state
pub const CAPA_STATUS_OPEN: &str = "open";
pub const CAPA_DEFAULT_PRIORITY: &str = "medium";

pub const TRAINING_STATUS_COMPLETED: &str = "completed";
pub const TRAINING_DEFAULT_STATUS: &str = "pending";

pub const AUDIT_DEFAULT_STATUS: &str = "planned";
pub const FINDING_DEFAULT_STATUS: &str = "open";

pub const PROJECT_DEFAULT_STATUS: &str = "active";
pub const DOCUMENT_DEFAULT_STATUS: &str = "active";

/// Deserialize `null` (or an absent field, with `#[serde(default)]`) as `T::default()`
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One KPI reading for one period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(default)]
pub struct ComplianceMetric {
    pub id: String,
    pub project_id: String,
    pub metric_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: f64,
    pub target_value: Option<f64>,
    pub unit: String,
    pub period: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Corrective and Preventive Action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(default)]
pub struct Capa {
    pub id: String,
    pub project_id: String,
    pub capa_number: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub capa_type: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Capa {
    pub fn is_open(&self) -> bool {
        self.status == CAPA_STATUS_OPEN
    }

    /// Open with a due date strictly before `today`.
    ///
    /// A CAPA without a due date is never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(default)]
pub struct TrainingRecord {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub training_name: String,
    pub training_type: String,
    pub status: String,
    pub completion_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub score: Option<f64>,
    pub certificate_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrainingRecord {
    pub fn is_completed(&self) -> bool {
        self.status == TRAINING_STATUS_COMPLETED
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(default)]
pub struct Audit {
    pub id: String,
    pub project_id: String,
    pub audit_number: String,
    pub area: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub audit_type: String,
    pub status: String,
    pub auditor: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(deserialize_with = "null_as_default")]
    pub findings_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Individual issue raised during an audit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(default)]
pub struct AuditFinding {
    pub id: String,
    pub audit_id: String,
    pub finding_type: String,
    pub severity: String,
    pub title: String,
    pub description: String,
    pub requirement: Option<String>,
    pub corrective_action: Option<String>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scored category of the compliance posture (e.g. "Document Control")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(default)]
pub struct ComplianceArea {
    pub id: String,
    pub project_id: String,
    pub area_name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub max_score: f64,
    pub last_assessment: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata row for a stored supporting document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(default)]
pub struct ComplianceDocument {
    pub id: String,
    pub project_id: String,
    pub document_name: String,
    pub document_type: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_by: String,
    pub category: Option<String>,
    pub version: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_capa_without_due_date_is_never_overdue() {
        let capa = Capa {
            status: CAPA_STATUS_OPEN.to_string(),
            due_date: None,
            ..Default::default()
        };
        assert!(!capa.is_overdue(date("2999-01-01")));
    }

    #[test]
    fn test_capa_due_today_is_not_overdue() {
        let capa = Capa {
            status: CAPA_STATUS_OPEN.to_string(),
            due_date: Some(date("2024-05-01")),
            ..Default::default()
        };
        assert!(!capa.is_overdue(date("2024-05-01")));
        assert!(capa.is_overdue(date("2024-05-02")));
    }

    #[test]
    fn test_closed_capa_is_not_overdue() {
        let capa = Capa {
            status: "closed".to_string(),
            due_date: Some(date("2020-01-01")),
            ..Default::default()
        };
        assert!(!capa.is_overdue(date("2024-01-01")));
    }

    #[test]
    fn test_audit_null_findings_count_reads_as_zero() {
        let audit: Audit = serde_json::from_str(r#"{"findings_count": null}"#).unwrap();
        assert_eq!(audit.findings_count, 0);

        let audit: Audit = serde_json::from_str(r#"{"area": "Labs"}"#).unwrap();
        assert_eq!(audit.findings_count, 0);
        assert_eq!(audit.area, "Labs");
    }

    #[test]
    fn test_capa_type_field_uses_wire_name() {
        let capa: Capa =
            serde_json::from_str(r#"{"type": "corrective", "due_date": "2020-01-01"}"#).unwrap();
        assert_eq!(capa.capa_type, "corrective");
        assert_eq!(capa.due_date, Some(date("2020-01-01")));

        let json = serde_json::to_value(&capa).unwrap();
        assert_eq!(json["type"], "corrective");
    }
}
