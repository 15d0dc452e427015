//! Compliance metric endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use qcdash_common::db::models::ComplianceMetric;
use serde::Deserialize;

use super::types::{required, required_str, DataResponse, IdQuery, MessageResponse, ProjectQuery, UpdateRequest};
use super::ApiError;
use crate::db::metrics::{self, MetricChanges, NewMetric};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMetricRequest {
    pub project_id: Option<String>,
    pub metric_type: Option<String>,
    pub value: Option<f64>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub period: Option<String>,
    pub date: Option<NaiveDate>,
}

impl CreateMetricRequest {
    fn validate(self) -> Result<NewMetric, ApiError> {
        Ok(NewMetric {
            project_id: required_str(self.project_id)?,
            metric_type: required_str(self.metric_type)?,
            value: required(self.value)?,
            target_value: self.target_value,
            unit: required_str(self.unit)?,
            period: required_str(self.period)?,
            date: required(self.date)?,
        })
    }
}

/// GET /api/compliance/metrics?project_id=
///
/// Newest period first; the dashboard reads the first `overall_compliance` row.
pub async fn list_metrics(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<DataResponse<Vec<ComplianceMetric>>>, ApiError> {
    let project_id = query.require()?;
    let metrics = metrics::list_by_project(&state.db, &project_id).await?;
    Ok(Json(DataResponse::new(metrics)))
}

pub async fn create_metric(
    State(state): State<AppState>,
    Json(request): Json<CreateMetricRequest>,
) -> Result<(StatusCode, Json<DataResponse<ComplianceMetric>>), ApiError> {
    let metric = metrics::insert(&state.db, request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(metric))))
}

pub async fn update_metric(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest<MetricChanges>>,
) -> Result<Json<DataResponse<ComplianceMetric>>, ApiError> {
    let (id, changes) = request.into_parts("Metric")?;
    let metric = metrics::update(&state.db, &id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Metric", &id))?;
    Ok(Json(DataResponse::new(metric)))
}

pub async fn delete_metric(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query.require("Metric")?;
    if !metrics::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Metric", &id));
    }
    Ok(Json(MessageResponse::deleted("Metric")))
}
