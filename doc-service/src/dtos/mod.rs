pub mod documents;

pub use documents::{HelloResponse, UpdateDocumentRequest, UpdateDocumentResponse};
