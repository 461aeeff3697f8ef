//! Connection provider and `DOC` table access for PostgreSQL.

use crate::config::DatabaseConfig;
use crate::models::{Document, DocumentUpdate};
use crate::services::store::DocumentStore;
use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use service_core::error::AppError;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Postgres;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

const LIST_DOCUMENTS_SQL: &str = "SELECT doc_id, summary_json, validation_status FROM DOC";

const UPDATE_DOCUMENT_SQL: &str =
    "UPDATE DOC SET summary_json = $1, validation_status = $2 WHERE doc_id = $3::bigint";

/// How session acquisition reacts to a failed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.acquire_retries,
            initial_backoff: config.retry_initial_backoff(),
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_backoff,
            current_interval: self.initial_backoff,
            // Attempt count, not elapsed time, ends the loop.
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    retry: RetryPolicy,
}

impl Database {
    /// Configure the pool without opening a connection, so the process can
    /// start while the database is down. Connection failures surface per
    /// request from [`Database::session`].
    #[instrument(skip(config), fields(host = %config.host, database = %config.name))]
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let retry = RetryPolicy::from_config(config);

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            acquire_timeout_secs = config.acquire_timeout_secs,
            acquire_retries = retry.max_retries,
            ssl_mode = ?config.ssl_mode(),
            "Configuring PostgreSQL pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect_lazy_with(config.connect_options());

        Self { pool, retry }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Check out a session, retrying with exponential backoff per the policy.
    #[instrument(skip(self))]
    pub async fn session(&self) -> Result<PoolConnection<Postgres>, AppError> {
        let attempts = AtomicU32::new(0);
        let attempts = &attempts;
        let pool = &self.pool;
        let max_retries = self.retry.max_retries;

        retry(self.retry.backoff(), move || async move {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed);
            pool.acquire().await.map_err(|e| {
                if attempt < max_retries {
                    warn!(
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        error = %e,
                        "Database connection failed, retrying"
                    );
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Database connection failed");
            AppError::ConnectionError(anyhow::anyhow!("Failed to acquire connection: {}", e))
        })
    }
}

fn record_query_duration(operation: &'static str, start: Instant) {
    metrics::histogram!("db_query_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

#[async_trait]
impl DocumentStore for Database {
    #[instrument(skip(self))]
    async fn list_documents(&self) -> Result<Vec<Document>, AppError> {
        let mut conn = self.session().await?;
        let start = Instant::now();

        let documents = sqlx::query_as::<_, Document>(LIST_DOCUMENTS_SQL)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!(error = %e, "Error fetching documents");
                AppError::QueryError(anyhow::anyhow!("Failed to list documents: {}", e))
            })?;

        record_query_duration("list_documents", start);
        debug!(count = documents.len(), "Documents fetched");

        Ok(documents)
    }

    #[instrument(skip(self, update), fields(doc_id = %doc_id))]
    async fn update_document(
        &self,
        doc_id: &str,
        update: &DocumentUpdate,
    ) -> Result<u64, AppError> {
        let mut conn = self.session().await?;
        let start = Instant::now();

        let result = sqlx::query(UPDATE_DOCUMENT_SQL)
            .bind(update.summary_json.as_deref())
            .bind(update.validation_status.as_deref())
            .bind(doc_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!(error = %e, "Error updating document");
                AppError::QueryError(anyhow::anyhow!(
                    "Failed to update document {}: {}",
                    doc_id,
                    e
                ))
            })?;

        record_query_duration("update_document", start);

        let rows_affected = result.rows_affected();
        if rows_affected == 0 {
            info!("Update matched no document");
        } else {
            debug!(rows_affected = rows_affected, "Document updated");
        }

        Ok(rows_affected)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        let mut conn = self.session().await?;

        sqlx::query("SELECT 1")
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::QueryError(anyhow::anyhow!("Health check failed: {}", e)))?;

        Ok(())
    }
}
