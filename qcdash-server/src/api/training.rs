//! Training record endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use qcdash_common::db::models::TrainingRecord;
use serde::Deserialize;

use super::types::{required_str, DataResponse, IdQuery, MessageResponse, ProjectQuery, UpdateRequest};
use super::ApiError;
use crate::db::training::{self, NewTrainingRecord, TrainingChanges};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTrainingRequest {
    pub project_id: Option<String>,
    pub user_id: Option<String>,
    pub training_name: Option<String>,
    pub training_type: Option<String>,
    pub status: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub score: Option<f64>,
    pub certificate_url: Option<String>,
}

impl CreateTrainingRequest {
    fn validate(self) -> Result<NewTrainingRecord, ApiError> {
        Ok(NewTrainingRecord {
            project_id: required_str(self.project_id)?,
            user_id: required_str(self.user_id)?,
            training_name: required_str(self.training_name)?,
            training_type: required_str(self.training_type)?,
            status: self.status,
            completion_date: self.completion_date,
            due_date: self.due_date,
            score: self.score,
            certificate_url: self.certificate_url,
        })
    }
}

pub async fn list_training(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<DataResponse<Vec<TrainingRecord>>>, ApiError> {
    let project_id = query.require()?;
    let records = training::list_by_project(&state.db, &project_id).await?;
    Ok(Json(DataResponse::new(records)))
}

pub async fn create_training(
    State(state): State<AppState>,
    Json(request): Json<CreateTrainingRequest>,
) -> Result<(StatusCode, Json<DataResponse<TrainingRecord>>), ApiError> {
    let record = training::insert(&state.db, request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(record))))
}

pub async fn update_training(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest<TrainingChanges>>,
) -> Result<Json<DataResponse<TrainingRecord>>, ApiError> {
    let (id, changes) = request.into_parts("Training record")?;
    let record = training::update(&state.db, &id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Training record", &id))?;
    Ok(Json(DataResponse::new(record)))
}

pub async fn delete_training(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query.require("Training record")?;
    if !training::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Training record", &id));
    }
    Ok(Json(MessageResponse::deleted("Training record")))
}
