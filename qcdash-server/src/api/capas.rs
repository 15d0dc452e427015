//! CAPA endpoints
//!
//! GET/POST/PUT/DELETE /api/compliance/capas

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use qcdash_common::db::models::Capa;
use serde::Deserialize;
use tracing::info;

use super::types::{required_str, DataResponse, IdQuery, MessageResponse, ProjectQuery, UpdateRequest};
use super::ApiError;
use crate::db::capas::{self, CapaChanges, NewCapa};
use crate::AppState;

/// POST body; required fields are checked before insert
#[derive(Debug, Deserialize)]
pub struct CreateCapaRequest {
    pub project_id: Option<String>,
    pub capa_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub capa_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
}

impl CreateCapaRequest {
    fn validate(self) -> Result<NewCapa, ApiError> {
        Ok(NewCapa {
            project_id: required_str(self.project_id)?,
            capa_number: required_str(self.capa_number)?,
            title: required_str(self.title)?,
            description: self.description,
            capa_type: required_str(self.capa_type)?,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            assigned_to: self.assigned_to,
            created_by: required_str(self.created_by)?,
        })
    }
}

/// GET /api/compliance/capas?project_id=
pub async fn list_capas(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<DataResponse<Vec<Capa>>>, ApiError> {
    let project_id = query.require()?;
    let capas = capas::list_by_project(&state.db, &project_id).await?;
    Ok(Json(DataResponse::new(capas)))
}

/// POST /api/compliance/capas
pub async fn create_capa(
    State(state): State<AppState>,
    Json(request): Json<CreateCapaRequest>,
) -> Result<(StatusCode, Json<DataResponse<Capa>>), ApiError> {
    let new = request.validate()?;
    let capa = capas::insert(&state.db, new).await?;
    info!("Created CAPA {} ({})", capa.capa_number, capa.id);
    Ok((StatusCode::CREATED, Json(DataResponse::new(capa))))
}

/// PUT /api/compliance/capas
pub async fn update_capa(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest<CapaChanges>>,
) -> Result<Json<DataResponse<Capa>>, ApiError> {
    let (id, changes) = request.into_parts("CAPA")?;
    let capa = capas::update(&state.db, &id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("CAPA", &id))?;
    Ok(Json(DataResponse::new(capa)))
}

/// DELETE /api/compliance/capas?id=
pub async fn delete_capa(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query.require("CAPA")?;
    if !capas::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("CAPA", &id));
    }
    info!("Deleted CAPA {}", id);
    Ok(Json(MessageResponse::deleted("CAPA")))
}
