/// Profile picture storage
///
/// Uploaded files are written to the configured upload directory under the
/// final component of their client-supplied name. The stored path
/// (`<dir>/<name>`) is what gets recorded on the user row.

use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};

use crate::error::{ApiError, ApiResult};

/// A file received in a multipart form
#[derive(Debug, Clone)]
pub struct Upload {
    /// Sanitized file name
    pub file_name: String,

    /// File contents
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Reads a file field
    ///
    /// Returns `None` for a field with no file name or an empty body, which is
    /// how browsers submit an untouched file input.
    pub async fn from_field(field: Field<'_>) -> ApiResult<Option<Self>> {
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let Some(file_name) = file_name else {
            return Ok(None);
        };
        if file_name.is_empty() && bytes.is_empty() {
            return Ok(None);
        }

        let file_name = sanitize_file_name(&file_name)
            .ok_or_else(|| ApiError::BadRequest("Invalid file name".to_string()))?;

        Ok(Some(Self {
            file_name,
            bytes: bytes.to_vec(),
        }))
    }

    /// Path recorded for this upload inside `dir`
    pub fn stored_path(&self, dir: &str) -> String {
        format!("{}/{}", dir.trim_end_matches('/'), self.file_name)
    }

    /// Writes the file into `dir`, creating the directory if needed
    ///
    /// Returns the stored path.
    pub async fn save(&self, dir: &str) -> ApiResult<String> {
        let path = self.stored_path(dir);

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ApiError::InternalError(format!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| ApiError::InternalError(format!("Failed to save upload: {}", e)))?;

        tracing::debug!(path = %path, size = self.bytes.len(), "Upload saved");
        Ok(path)
    }

    /// Deletes a previously saved file, logging rather than failing
    pub async fn remove(&self, dir: &str) {
        let path = self.stored_path(dir);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path, error = %e, "Failed to remove upload");
        }
    }
}

/// Keeps only the final path component of a client-supplied file name
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }

    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

/// Maps a multipart parsing failure to a 400
pub fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}
