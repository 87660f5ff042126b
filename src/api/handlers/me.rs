/*
 * Responsibility
 * - GET /api/auth/me: echo the resolved principal
 * - Guarded by an explicit authenticated rule, so the principal here is never anonymous
 */
use axum::Json;
use serde::Serialize;

use crate::api::extractors::CurrentPrincipal;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Option<i64>,
    pub email: String,
    pub roles: Vec<String>,
}

pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Result<Json<MeResponse>, AppError> {
    let email = principal.subject.clone().ok_or(AppError::Unauthorized)?;

    Ok(Json(MeResponse {
        id: principal.id,
        email,
        roles: principal
            .authorities
            .iter()
            .map(|a| a.as_str().to_string())
            .collect(),
    }))
}
