//! Compliance area endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use qcdash_common::areas::{score_areas, AreaScore};
use qcdash_common::db::models::ComplianceArea;
use serde::{Deserialize, Serialize};

use super::types::{required, required_str, DataResponse, IdQuery, MessageResponse, ProjectQuery, UpdateRequest};
use super::ApiError;
use crate::db::areas::{self, AreaChanges, NewArea};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAreaRequest {
    pub project_id: Option<String>,
    pub area_name: Option<String>,
    pub description: Option<String>,
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub last_assessment: Option<NaiveDate>,
}

impl CreateAreaRequest {
    fn validate(self) -> Result<NewArea, ApiError> {
        Ok(NewArea {
            project_id: required_str(self.project_id)?,
            area_name: required_str(self.area_name)?,
            description: self.description,
            score: required(self.score)?,
            max_score: required(self.max_score)?,
            last_assessment: self.last_assessment,
        })
    }
}

/// Areas alongside their computed percentage and band
#[derive(Debug, Serialize)]
pub struct AreaListResponse {
    pub areas: Vec<ComplianceArea>,
    pub scores: Vec<AreaScore>,
}

/// GET /api/compliance/areas?project_id=
pub async fn list_areas(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<DataResponse<AreaListResponse>>, ApiError> {
    let project_id = query.require()?;
    let areas = areas::list_by_project(&state.db, &project_id).await?;
    let scores = score_areas(&areas);
    Ok(Json(DataResponse::new(AreaListResponse { areas, scores })))
}

pub async fn create_area(
    State(state): State<AppState>,
    Json(request): Json<CreateAreaRequest>,
) -> Result<(StatusCode, Json<DataResponse<ComplianceArea>>), ApiError> {
    let area = areas::insert(&state.db, request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(area))))
}

pub async fn update_area(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest<AreaChanges>>,
) -> Result<Json<DataResponse<ComplianceArea>>, ApiError> {
    let (id, changes) = request.into_parts("Compliance area")?;
    let area = areas::update(&state.db, &id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Compliance area", &id))?;
    Ok(Json(DataResponse::new(area)))
}

pub async fn delete_area(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query.require("Compliance area")?;
    if !areas::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Compliance area", &id));
    }
    Ok(Json(MessageResponse::deleted("Compliance area")))
}
