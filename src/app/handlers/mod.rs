pub mod auth;
pub mod contacts;
pub mod upload;

use crate::app::error::ApiError;
use crate::app::AppState;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};

pub async fn root_handler() -> &'static str {
    "server is running"
}

/// Token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Owner id for records written by this request, when the caller sent a token.
pub(crate) async fn resolve_owner(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<String>, ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    let user = state
        .identity
        .get_user(token)
        .await
        .map_err(|e| ApiError::with_status(StatusCode::FORBIDDEN, e))?;
    Ok(Some(user.id))
}
