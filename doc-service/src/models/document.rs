//! Row model for the external `DOC` table.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// One `DOC` row. Field names are the column names and the JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: i64,
    /// JSON text, stored and returned verbatim.
    pub summary_json: Option<String>,
    pub validation_status: Option<String>,
}

// The key column may be BIGINT or INTEGER; both widen to i64.
impl<'r> FromRow<'r, PgRow> for Document {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let doc_id = match row.try_get::<i64, _>("doc_id") {
            Ok(id) => id,
            Err(sqlx::Error::ColumnDecode { .. }) => i64::from(row.try_get::<i32, _>("doc_id")?),
            Err(e) => return Err(e),
        };

        Ok(Self {
            doc_id,
            summary_json: row.try_get("summary_json")?,
            validation_status: row.try_get("validation_status")?,
        })
    }
}

/// New values for the two mutable columns of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpdate {
    pub summary_json: Option<String>,
    pub validation_status: Option<String>,
}

impl Document {
    /// Copy of this row with the update applied.
    pub fn with_update(&self, update: &DocumentUpdate) -> Self {
        Self {
            doc_id: self.doc_id,
            summary_json: update.summary_json.clone(),
            validation_status: update.validation_status.clone(),
        }
    }
}
