//! Local document storage
//!
//! Uploaded compliance documents live under
//! `<root>/<project_id>/<unix_millis>-<uuid>.<ext>` and are served back at
//! `/files/<project_id>/<file name>`.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum accepted upload size (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// URL prefix the document folder is served under
pub const FILES_URL_PREFIX: &str = "/files";

/// Accepted extensions and the MIME type reported for each
const ACCEPTED_TYPES: [(&str, &str); 9] = [
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
];

/// Result of a successful store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Lowercased extension without the dot
    pub extension: String,
    /// Public URL under [`FILES_URL_PREFIX`]
    pub url: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DocumentStorage {
    root: PathBuf,
}

impl DocumentStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` for `project_id`, naming the file after the current time
    /// and a fresh UUID while keeping the original extension
    pub async fn store(&self, project_id: &str, extension: &str, bytes: &[u8]) -> io::Result<StoredFile> {
        if !is_safe_component(project_id) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid project id for storage: {}", project_id),
            ));
        }

        let dir = self.root.join(project_id);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        );
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());

        Ok(StoredFile {
            extension: extension.to_string(),
            url: format!("{}/{}/{}", FILES_URL_PREFIX, project_id, file_name),
            path,
        })
    }

    /// Map a public file URL back to its path inside the store
    ///
    /// Returns `None` for URLs outside the store.
    pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(FILES_URL_PREFIX)?.strip_prefix('/')?;
        let mut parts = relative.split('/');
        let (project_id, file_name) = (parts.next()?, parts.next()?);
        if parts.next().is_some() || !is_safe_component(project_id) || !is_safe_file_name(file_name) {
            return None;
        }
        Some(self.root.join(project_id).join(file_name))
    }

    /// Delete the file behind `url`; failures are logged, never returned
    pub async fn remove(&self, url: &str) {
        let Some(path) = self.path_for_url(url) else {
            warn!("Not removing file outside document store: {}", url);
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed stored file {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Stored file already gone: {}", path.display())
            }
            Err(e) => warn!("Failed to remove stored file {}: {}", path.display(), e),
        }
    }
}

/// Lowercased extension of `file_name` if it is an accepted document type
pub fn accepted_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ACCEPTED_TYPES
        .iter()
        .any(|(accepted, _)| *accepted == ext)
        .then_some(ext)
}

/// MIME type reported for an accepted extension
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    ACCEPTED_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

fn is_safe_component(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 128
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_safe_file_name(s: &str) -> bool {
    match s.split_once('.') {
        Some((stem, ext)) => is_safe_component(stem) && is_safe_component(ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_extension() {
        assert_eq!(accepted_extension("SOP-12.pdf"), Some("pdf".to_string()));
        assert_eq!(accepted_extension("report.final.XLSX"), Some("xlsx".to_string()));
        assert_eq!(accepted_extension("photo.JPeG"), Some("jpeg".to_string()));
        assert_eq!(accepted_extension("script.sh"), None);
        assert_eq!(accepted_extension("no_extension"), None);
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("pdf"), Some("application/pdf"));
        assert_eq!(mime_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("exe"), None);
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DocumentStorage::new(dir.path().to_path_buf());

        let stored = storage.store("project-1", "pdf", b"%PDF-1.4").await.unwrap();
        assert!(stored.path.exists());
        assert!(stored.url.starts_with("/files/project-1/"));
        assert!(stored.url.ends_with(".pdf"));
        assert_eq!(storage.path_for_url(&stored.url), Some(stored.path.clone()));

        storage.remove(&stored.url).await;
        assert!(!stored.path.exists());

        // Removing twice only logs
        storage.remove(&stored.url).await;
    }

    #[tokio::test]
    async fn test_store_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DocumentStorage::new(dir.path().to_path_buf());

        let result = storage.store("../escape", "pdf", b"x").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_path_for_url_rejects_foreign_urls() {
        let storage = DocumentStorage::new(PathBuf::from("/data/documents"));

        assert_eq!(storage.path_for_url("https://example.com/a.pdf"), None);
        assert_eq!(storage.path_for_url("/files/../etc/passwd"), None);
        assert_eq!(storage.path_for_url("/files/p1/../../x.pdf"), None);
        assert_eq!(
            storage.path_for_url("/files/p1/1700000000000-abc.pdf"),
            Some(PathBuf::from("/data/documents/p1/1700000000000-abc.pdf"))
        );
    }
}
