use crate::app::error::{ApiError, JsonBody};
use crate::app::handlers::resolve_owner;
use crate::app::AppState;
use crate::domain::model::{ContactFilter, ContactKey, ContactPatch, NewContact};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn create_contact_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<NewContact>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let owner = resolve_owner(&state, &headers).await?;
    let contact = state.contacts.create(payload, owner.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(json!({ "contact": contact }))))
}

pub async fn list_contacts_handler(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Value>, ApiError> {
    let contacts = state.contacts.list(&filter).await?;
    Ok(Json(json!({ "contacts": contacts })))
}

pub async fn get_contact_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let contact = state.contacts.get(&ContactKey::parse(&key)).await?;
    Ok(Json(json!({ "contact": contact })))
}

pub async fn update_contact_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    JsonBody(patch): JsonBody<ContactPatch>,
) -> Result<Json<Value>, ApiError> {
    let contact = state
        .contacts
        .update(&ContactKey::parse(&key), &patch)
        .await?;
    Ok(Json(json!({ "contact": contact })))
}

pub async fn delete_contact_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state.contacts.delete(&ContactKey::parse(&key)).await?;
    Ok(Json(json!({
        "message": "Contact deleted",
        "id": deleted.id,
    })))
}
