use crate::models::{Document, DocumentUpdate};
use async_trait::async_trait;
use service_core::error::AppError;

/// Access to the document table. Each call issues exactly one statement.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every row, in whatever order the database returns them.
    async fn list_documents(&self) -> Result<Vec<Document>, AppError>;

    /// Overwrite summary and status of `doc_id`. Returns the number of rows
    /// changed; zero is not an error. An id the key column cannot represent
    /// is a `QueryError`.
    async fn update_document(&self, doc_id: &str, update: &DocumentUpdate)
        -> Result<u64, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
