//! Concurrent fetch of the four record sets the KPI aggregator reads

use qcdash_common::db::models::{Audit, Capa, ComplianceMetric, TrainingRecord};
use qcdash_common::RecordSets;
use sqlx::SqlitePool;
use tracing::debug;

use super::{audits, capas, metrics, training};

/// Owned record sets for one project
#[derive(Debug, Clone, Default)]
pub struct ProjectRecords {
    pub metrics: Vec<ComplianceMetric>,
    pub capas: Vec<Capa>,
    pub training_records: Vec<TrainingRecord>,
    pub audits: Vec<Audit>,
}

impl ProjectRecords {
    pub fn as_record_sets(&self) -> RecordSets<'_> {
        RecordSets {
            metrics: &self.metrics,
            capas: &self.capas,
            training_records: &self.training_records,
            audits: &self.audits,
        }
    }
}

/// Fetch metrics, CAPAs, training records and audits for `project_id`
///
/// The four queries run concurrently; the first failure aborts the rest.
pub async fn fetch_record_sets(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<ProjectRecords, sqlx::Error> {
    let (metrics, capas, training_records, audits) = tokio::try_join!(
        metrics::list_by_project(pool, project_id),
        capas::list_by_project(pool, project_id),
        training::list_by_project(pool, project_id),
        audits::list_by_project(pool, project_id),
    )?;

    debug!(
        "Fetched project {}: {} metrics, {} CAPAs, {} training records, {} audits",
        project_id,
        metrics.len(),
        capas.len(),
        training_records.len(),
        audits.len()
    );

    Ok(ProjectRecords {
        metrics,
        capas,
        training_records,
        audits,
    })
}
