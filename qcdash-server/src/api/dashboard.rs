//! Dashboard endpoints
//!
//! `GET /api/dashboard` reads a stored project; `POST /api/dashboard/kpis`
//! aggregates record sets supplied by the caller. Both run the same
//! aggregator with the server's KPI settings.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use qcdash_common::areas::{score_areas, AreaScore};
use qcdash_common::db::models::{Audit, Capa, ComplianceMetric, TrainingRecord};
use qcdash_common::{kpi, time, KpiSummary, RecordSets};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{non_empty, DataResponse};
use super::ApiError;
use crate::db::{self, fetch_record_sets};
use crate::AppState;

/// Number of audits listed on the dashboard
pub const RECENT_AUDIT_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub project_id: String,
    /// Date the overdue check ran against
    pub generated_on: NaiveDate,
    pub kpis: KpiSummary,
    pub areas: Vec<AreaScore>,
    pub recent_audits: Vec<Audit>,
    pub document_count: i64,
}

/// Query parameters for GET /api/dashboard
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub project_id: Option<String>,
    /// `YYYY-MM-DD` date to check CAPA due dates against; defaults to today
    pub as_of: Option<String>,
}

/// Record sets in a POST body; absent sets are empty
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KpiRequest {
    pub metrics: Vec<ComplianceMetric>,
    pub capas: Vec<Capa>,
    pub training_records: Vec<TrainingRecord>,
    pub audits: Vec<Audit>,
}

/// GET /api/dashboard?project_id=&as_of=
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DataResponse<DashboardResponse>>, ApiError> {
    let project_id = non_empty(query.project_id).ok_or_else(|| ApiError::required("Project ID"))?;
    let today = match non_empty(query.as_of) {
        Some(date) => time::parse_date(&date)?,
        None => time::today(),
    };

    let (records, areas, document_count) = tokio::try_join!(
        fetch_record_sets(&state.db, &project_id),
        db::areas::list_by_project(&state.db, &project_id),
        db::documents::count_by_project(&state.db, &project_id),
    )?;

    let kpis = kpi::summarize(records.as_record_sets(), today, &state.kpi);
    debug!(
        "Dashboard for {}: compliance {}%, {} open CAPAs",
        project_id, kpis.compliance.rate, kpis.capas.open
    );

    let mut recent_audits = records.audits;
    recent_audits.truncate(RECENT_AUDIT_LIMIT);

    Ok(Json(DataResponse::new(DashboardResponse {
        project_id,
        generated_on: today,
        kpis,
        areas: score_areas(&areas),
        recent_audits,
        document_count,
    })))
}

/// POST /api/dashboard/kpis
pub async fn compute_kpis(
    State(state): State<AppState>,
    Json(request): Json<KpiRequest>,
) -> Json<DataResponse<KpiSummary>> {
    let records = RecordSets {
        metrics: &request.metrics,
        capas: &request.capas,
        training_records: &request.training_records,
        audits: &request.audits,
    };
    Json(DataResponse::new(kpi::summarize(
        records,
        time::today(),
        &state.kpi,
    )))
}
