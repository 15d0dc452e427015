//! Request/response envelopes shared by the record handlers

use serde::{Deserialize, Serialize};

use super::ApiError;

/// Successful record response: `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Successful delete response: `{"message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted(what: &str) -> Self {
        Self {
            message: format!("{} deleted successfully", what),
        }
    }
}

/// `?project_id=` filter for list endpoints
#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub project_id: Option<String>,
}

impl ProjectQuery {
    pub fn require(self) -> Result<String, ApiError> {
        non_empty(self.project_id).ok_or_else(|| ApiError::required("Project ID"))
    }
}

/// `?id=` for delete endpoints
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    pub fn require(self, what: &str) -> Result<String, ApiError> {
        non_empty(self.id).ok_or_else(|| ApiError::required(&format!("{} ID", what)))
    }
}

/// PUT body: the record id plus the fields to change
#[derive(Debug, Deserialize)]
pub struct UpdateRequest<T> {
    pub id: Option<String>,
    #[serde(flatten)]
    pub changes: T,
}

impl<T> UpdateRequest<T> {
    pub fn into_parts(self, what: &str) -> Result<(String, T), ApiError> {
        let id = non_empty(self.id).ok_or_else(|| ApiError::required(&format!("{} ID", what)))?;
        Ok((id, self.changes))
    }
}

/// `None` for absent or blank strings
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Unwrap a required create field or fail with "Missing required fields"
pub fn required<T>(value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(ApiError::missing_fields)
}

/// [`required`] for strings, treating blank as missing
pub fn required_str(value: Option<String>) -> Result<String, ApiError> {
    non_empty(value).ok_or_else(ApiError::missing_fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Default, PartialEq)]
    struct Changes {
        title: Option<String>,
    }

    #[test]
    fn test_update_request_flattens_changes() {
        let req: UpdateRequest<Changes> =
            serde_json::from_str(r#"{"id": "c1", "title": "New"}"#).unwrap();
        let (id, changes) = req.into_parts("CAPA").unwrap();
        assert_eq!(id, "c1");
        assert_eq!(changes.title.as_deref(), Some("New"));
    }

    #[test]
    fn test_update_request_requires_id() {
        let req: UpdateRequest<Changes> = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        let err = req.into_parts("CAPA").unwrap_err();
        assert_eq!(err.to_string(), "CAPA ID is required");
    }

    #[test]
    fn test_required_str_rejects_blank() {
        assert!(required_str(Some("  ".to_string())).is_err());
        assert!(required_str(None).is_err());
        assert_eq!(required_str(Some("x".to_string())).unwrap(), "x");
    }

    #[test]
    fn test_project_query_require() {
        let q = ProjectQuery { project_id: Some(String::new()) };
        assert_eq!(q.require().unwrap_err().to_string(), "Project ID is required");
    }
}
