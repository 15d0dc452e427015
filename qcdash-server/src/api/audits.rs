//! Audit endpoints, including the per-audit severity tally

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use qcdash_common::db::models::Audit;
use qcdash_common::kpi::SeverityCounts;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::types::{required, required_str, DataResponse, IdQuery, MessageResponse, ProjectQuery, UpdateRequest};
use super::ApiError;
use crate::db::audits::{self, AuditChanges, NewAudit};
use crate::db::findings;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAuditRequest {
    pub project_id: Option<String>,
    pub audit_number: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "type")]
    pub audit_type: Option<String>,
    pub status: Option<String>,
    pub auditor: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub findings_count: Option<i64>,
}

impl CreateAuditRequest {
    fn validate(self) -> Result<NewAudit, ApiError> {
        if self.findings_count.is_some_and(|n| n < 0) {
            return Err(ApiError::BadRequest(
                "findings_count must not be negative".to_string(),
            ));
        }
        Ok(NewAudit {
            project_id: required_str(self.project_id)?,
            audit_number: required_str(self.audit_number)?,
            area: required_str(self.area)?,
            audit_type: required_str(self.audit_type)?,
            status: self.status,
            auditor: required_str(self.auditor)?,
            start_date: required(self.start_date)?,
            end_date: self.end_date,
            findings_count: self.findings_count,
        })
    }
}

/// Severity tally for one audit's recorded findings
#[derive(Debug, Serialize)]
pub struct AuditSeverityResponse {
    pub audit_id: String,
    /// Count the audit row itself reports
    pub findings_count: i64,
    pub severity: SeverityCounts,
}

/// GET /api/compliance/audits?project_id=
///
/// Most recent start date first.
pub async fn list_audits(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<DataResponse<Vec<Audit>>>, ApiError> {
    let project_id = query.require()?;
    let audits = audits::list_by_project(&state.db, &project_id).await?;
    Ok(Json(DataResponse::new(audits)))
}

pub async fn create_audit(
    State(state): State<AppState>,
    Json(request): Json<CreateAuditRequest>,
) -> Result<(StatusCode, Json<DataResponse<Audit>>), ApiError> {
    let audit = audits::insert(&state.db, request.validate()?).await?;
    info!("Created audit {} ({})", audit.audit_number, audit.id);
    Ok((StatusCode::CREATED, Json(DataResponse::new(audit))))
}

pub async fn update_audit(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest<AuditChanges>>,
) -> Result<Json<DataResponse<Audit>>, ApiError> {
    let (id, changes) = request.into_parts("Audit")?;
    let audit = audits::update(&state.db, &id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Audit", &id))?;
    Ok(Json(DataResponse::new(audit)))
}

/// DELETE /api/compliance/audits?id=
///
/// The audit's findings go with it.
pub async fn delete_audit(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query.require("Audit")?;
    if !audits::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Audit", &id));
    }
    info!("Deleted audit {}", id);
    Ok(Json(MessageResponse::deleted("Audit")))
}

/// GET /api/compliance/audits/:id/severity
///
/// Counts the audit's findings by their recorded severity. This is separate
/// from the dashboard's fixed-ratio breakdown and never replaces it.
pub async fn audit_severity(
    State(state): State<AppState>,
    Path(audit_id): Path<String>,
) -> Result<Json<DataResponse<AuditSeverityResponse>>, ApiError> {
    let audit = audits::get(&state.db, &audit_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Audit", &audit_id))?;
    let findings = findings::list_by_audit(&state.db, &audit_id).await?;

    Ok(Json(DataResponse::new(AuditSeverityResponse {
        audit_id: audit.id,
        findings_count: audit.findings_count,
        severity: SeverityCounts::tally(&findings),
    })))
}
