use axum::http::Uri;

use crate::error::AppError;

/// Anything the gate let through but no handler here serves.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(uri.path())
}
