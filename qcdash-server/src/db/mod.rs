//! Record fetch layer for qcdash-server
//!
//! Per-entity queries, every list filtered by `project_id` equality (or
//! `audit_id` for findings). Writes go through `insert`/`update`/`delete`
//! and return the stored row.

pub mod areas;
pub mod audits;
pub mod capas;
pub mod dashboard;
pub mod documents;
pub mod findings;
pub mod metrics;
pub mod projects;
pub mod training;

pub use dashboard::{fetch_record_sets, ProjectRecords};

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable change field so an explicit `null` is kept apart
/// from an absent key
///
/// Use with `#[serde(default)]`: absent is `None`, `null` is `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::capas::CapaChanges;
    use chrono::NaiveDate;

    #[test]
    fn test_nullable_distinguishes_null_from_absent() {
        let changes: CapaChanges = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(changes.due_date, Some(None));

        let changes: CapaChanges = serde_json::from_str(r#"{"status": "closed"}"#).unwrap();
        assert_eq!(changes.due_date, None);

        let changes: CapaChanges = serde_json::from_str(r#"{"due_date": "2025-06-30"}"#).unwrap();
        assert_eq!(
            changes.due_date,
            Some(Some(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()))
        );
    }
}
