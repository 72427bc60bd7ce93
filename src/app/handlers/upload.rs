use crate::app::error::{status_for, ApiError};
use crate::app::handlers::resolve_owner;
use crate::app::AppState;
use crate::core::import::ImportFailure;
use crate::domain::model::ImportSummary;
use crate::domain::ports::ChunkSource;
use crate::utils::error::{ContactError, Result};
use async_trait::async_trait;
use axum::{
    extract::{multipart::{Field, MultipartRejection}, Multipart, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::json;
use std::sync::Arc;

/// Multipart field carrying the CSV.
pub const FILE_FIELD: &str = "file";

#[async_trait]
impl<'a> ChunkSource for Field<'a> {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        self.chunk().await.map_err(|e| ContactError::Upload {
            message: e.body_text(),
        })
    }
}

fn import_response(outcome: std::result::Result<ImportSummary, ImportFailure>) -> Response {
    match outcome {
        Ok(summary) => Json(json!({
            "message": "CSV imported",
            "count": summary.inserted,
            "rowsSeen": summary.rows_seen,
            "rejected": summary.rejected,
        }))
        .into_response(),
        Err(failure) => (
            status_for(&failure.error),
            Json(json!({
                "error": failure.error.to_string(),
                "count": 0,
                "rowsSeen": failure.rows_seen,
                "rejected": failure.rejected,
            })),
        )
            .into_response(),
    }
}

pub async fn upload_csv_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Response, ApiError> {
    let mut multipart = multipart?;
    let owner = resolve_owner(&state, &headers).await?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::from(ContactError::Upload {
            message: e.body_text(),
        })
    })? {
        if field.name() == Some(FILE_FIELD) {
            tracing::debug!("Receiving upload {:?}", field.file_name());
            return Ok(import_response(state.importer.run(Some(field), owner).await));
        }
    }

    Ok(import_response(
        state.importer.run(None::<Field<'_>>, owner).await,
    ))
}
