use crate::dtos::{UpdateDocumentRequest, UpdateDocumentResponse};
use crate::extractors::JsonOrForm;
use crate::models::Document;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

/// `GET /api/doc`: every row of the table.
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = state.store.list_documents().await?;
    Ok(Json(documents))
}

/// `PUT /api/doc/:id`: overwrite summary and status.
///
/// Succeeds whether or not a row matched `id`. The id is passed through as
/// text; a value the key column cannot hold fails in the database.
pub async fn update_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    JsonOrForm(request): JsonOrForm<UpdateDocumentRequest>,
) -> Result<Json<UpdateDocumentResponse>, AppError> {
    let update = request.into_update();
    state.store.update_document(&doc_id, &update).await?;

    Ok(Json(UpdateDocumentResponse { success: true }))
}
