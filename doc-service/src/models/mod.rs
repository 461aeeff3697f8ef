//! Domain models for doc-service.

mod document;

pub use document::{Document, DocumentUpdate};
