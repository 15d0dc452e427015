//! Project endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use qcdash_common::db::models::Project;
use serde::Deserialize;

use super::types::{non_empty, required_str, DataResponse};
use super::ApiError;
use crate::db::projects::{self, NewProject};
use crate::AppState;

/// `?owner_id=` filter
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner_id: Option<String>,
}

impl OwnerQuery {
    fn require(self) -> Result<String, ApiError> {
        non_empty(self.owner_id).ok_or_else(|| ApiError::required("Owner ID"))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner_id: Option<String>,
    pub status: Option<String>,
}

/// GET /api/projects?owner_id=
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<DataResponse<Vec<Project>>>, ApiError> {
    let owner_id = query.require()?;
    let projects = projects::list_by_owner(&state.db, &owner_id).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<DataResponse<Project>>), ApiError> {
    let new = NewProject {
        name: required_str(request.name)?,
        description: request.description,
        owner_id: required_str(request.owner_id)?,
        status: request.status,
    };
    let project = projects::insert(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// GET /api/projects/default?owner_id=
///
/// The owner's first project; created on first request.
pub async fn default_project(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<DataResponse<Project>>, ApiError> {
    let owner_id = query.require()?;
    let project = projects::default_project(&state.db, &owner_id).await?;
    Ok(Json(DataResponse::new(project)))
}
