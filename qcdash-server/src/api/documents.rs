//! Compliance document endpoints
//!
//! Uploads arrive as the raw request body with the metadata in the query
//! string. Bytes go to [`crate::storage::DocumentStorage`]; the row records
//! the public URL.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use qcdash_common::db::models::ComplianceDocument;
use serde::Deserialize;
use tracing::{info, warn};

use super::types::{required_str, DataResponse, IdQuery, MessageResponse, ProjectQuery};
use super::ApiError;
use crate::db::documents::{self, NewDocument};
use crate::storage::{accepted_extension, mime_for_extension};
use crate::AppState;

/// Query parameters for POST /api/compliance/documents/upload
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub project_id: Option<String>,
    /// Original file name; its extension selects the document type
    pub file_name: Option<String>,
    pub uploaded_by: Option<String>,
    pub category: Option<String>,
    pub version: Option<String>,
}

/// GET /api/compliance/documents?project_id=
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<DataResponse<Vec<ComplianceDocument>>>, ApiError> {
    let project_id = query.require()?;
    let documents = documents::list_by_project(&state.db, &project_id).await?;
    Ok(Json(DataResponse::new(documents)))
}

/// POST /api/compliance/documents/upload
pub async fn upload_document(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<DataResponse<ComplianceDocument>>), ApiError> {
    let project_id = required_str(query.project_id)?;
    let file_name = required_str(query.file_name)?;
    let uploaded_by = required_str(query.uploaded_by)?;

    if body.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let extension = accepted_extension(&file_name)
        .ok_or_else(|| ApiError::UnsupportedType(file_name.clone()))?;

    // Prefer the client's content type unless it is missing or generic
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "application/octet-stream")
        .map(str::to_string)
        .or_else(|| mime_for_extension(&extension).map(str::to_string))
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let stored = state.storage.store(&project_id, &extension, &body).await?;

    let new = NewDocument {
        project_id,
        document_name: file_name,
        document_type: stored.extension.clone(),
        file_url: stored.url.clone(),
        file_size: body.len() as i64,
        mime_type,
        uploaded_by,
        category: query.category,
        version: query.version,
    };

    match documents::insert(&state.db, new).await {
        Ok(document) => {
            info!(
                "Uploaded document {} ({} bytes) as {}",
                document.document_name, document.file_size, document.file_url
            );
            Ok((StatusCode::CREATED, Json(DataResponse::new(document))))
        }
        Err(e) => {
            warn!("Document row insert failed, removing {}: {}", stored.url, e);
            state.storage.remove(&stored.url).await;
            Err(e.into())
        }
    }
}

/// DELETE /api/compliance/documents?id=
///
/// Removes the row, then the stored file if it is still there.
pub async fn delete_document(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = query.require("Document")?;
    let document = documents::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Document", &id))?;

    if !documents::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Document", &id));
    }
    state.storage.remove(&document.file_url).await;

    info!("Deleted document {}", id);
    Ok(Json(MessageResponse::deleted("Document")))
}
