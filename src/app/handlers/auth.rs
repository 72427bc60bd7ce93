use crate::app::error::{ApiError, JsonBody};
use crate::app::handlers::bearer_token;
use crate::app::AppState;
use crate::domain::model::SignUpRequest;
use crate::utils::error::ContactError;
use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct SignInPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn credentials_required() -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "Email and password required")
}

pub async fn sign_up_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<SignUpRequest>,
) -> Result<Json<Value>, ApiError> {
    if !present(&payload.email) || !present(&payload.password) {
        return Err(credentials_required());
    }

    let user = state
        .identity
        .sign_up(&payload)
        .await
        .map_err(|e| ApiError::with_status(StatusCode::BAD_REQUEST, e))?;

    tracing::info!("Signed up user {}", user.id);
    Ok(Json(json!({ "user": user, "message": "Signup successful" })))
}

pub async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<SignInPayload>,
) -> Result<Json<Value>, ApiError> {
    let (Some(email), Some(password)) = (&payload.email, &payload.password) else {
        return Err(credentials_required());
    };
    if email.trim().is_empty() || password.is_empty() {
        return Err(credentials_required());
    }

    let session = state
        .identity
        .sign_in(email, password)
        .await
        .map_err(|e| ApiError::with_status(StatusCode::BAD_REQUEST, e))?;

    Ok(Json(json!({ "user": session.user, "session": session })))
}

pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let Some(token) = bearer_token(&headers) else {
        return Err(ContactError::Unauthorized {
            message: "No token".to_string(),
        }
        .into());
    };

    let user = state
        .identity
        .get_user(token)
        .await
        .map_err(|e| ApiError::with_status(StatusCode::FORBIDDEN, e))?;

    Ok(Json(json!({ "message": "Protected route", "user": user })))
}
