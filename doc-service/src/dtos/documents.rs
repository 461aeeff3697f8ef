use crate::models::DocumentUpdate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `PUT /api/doc/:id`. Absent or `null` fields write SQL `NULL`.
///
/// Both fields take any JSON value: strings are written verbatim, anything
/// else as its JSON text. The database is the only validator.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    pub summary_json: Option<Value>,
    #[serde(default)]
    pub validation_status: Option<Value>,
}

impl UpdateDocumentRequest {
    pub fn into_update(self) -> DocumentUpdate {
        DocumentUpdate {
            summary_json: column_text(self.summary_json),
            validation_status: column_text(self.validation_status),
        }
    }
}

fn column_text(value: Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateDocumentResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelloResponse {
    pub message: String,
}
