//! Audit finding endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use qcdash_common::db::models::AuditFinding;
use serde::Deserialize;

use super::types::{non_empty, required_str, DataResponse, IdQuery, MessageResponse, UpdateRequest};
use super::ApiError;
use crate::db::findings::{self, FindingChanges, NewFinding};
use crate::AppState;

/// `?audit_id=` filter
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub audit_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFindingRequest {
    pub audit_id: Option<String>,
    pub finding_type: Option<String>,
    pub severity: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirement: Option<String>,
    pub corrective_action: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
}

impl CreateFindingRequest {
    fn validate(self) -> Result<NewFinding, ApiError> {
        Ok(NewFinding {
            audit_id: required_str(self.audit_id)?,
            finding_type: required_str(self.finding_type)?,
            severity: required_str(self.severity)?,
            title: required_str(self.title)?,
            description: required_str(self.description)?,
            requirement: self.requirement,
            corrective_action: self.corrective_action,
            status: self.status,
            due_date: self.due_date,
            assigned_to: self.assigned_to,
        })
    }
}

/// GET /api/compliance/findings?audit_id=
pub async fn list_findings(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<DataResponse<Vec<AuditFinding>>>, ApiError> {
    let audit_id = non_empty(query.audit_id).ok_or_else(|| ApiError::required("Audit ID"))?;
    let findings = findings::list_by_audit(&state.db, &audit_id).await?;
    Ok(Json(DataResponse::new(findings)))
}

pub async fn create_finding(
    State(state): State<AppState>,
    Json(request): Json<CreateFindingRequest>,
) -> Result<(StatusCode, Json<DataResponse<AuditFinding>>), ApiError> {
    let finding = findings::insert(&state.db, request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(finding))))
}

pub async fn update_finding(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest<FindingChanges>>,
) -> Result<Json<DataResponse<AuditFinding>>, ApiError> {
    let (id, changes) = request.into_parts("Finding")?;
    let finding = findings::update(&state.db, &id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Finding", &id))?;
    Ok(Json(DataResponse::new(finding)))
}

pub async fn delete_finding(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query.require("Finding")?;
    if !findings::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Finding", &id));
    }
    Ok(Json(MessageResponse::deleted("Finding")))
}
