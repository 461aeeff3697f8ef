//! Test helper module for doc-service integration tests.
//!
//! Provides an in-memory store, config builders and a spawned application.

#![allow(dead_code)]

use async_trait::async_trait;
use doc_service::config::DocConfig;
use doc_service::models::{Document, DocumentUpdate};
use doc_service::services::{init_metrics, DocumentStore};
use doc_service::startup::Application;
use service_core::config as core_config;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

// Counter for unique schema names
static SCHEMA_COUNTER: AtomicU32 = AtomicU32::new(0);

/// `DOC` table held in memory. With `failing` set every call errors the way
/// an unreachable database does.
#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<Vec<Document>>,
    failing: bool,
}

impl InMemoryStore {
    pub fn with_rows(rows: Vec<Document>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn rows(&self) -> Vec<Document> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing {
            return Err(AppError::ConnectionError(anyhow::anyhow!(
                "connection refused"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_documents(&self) -> Result<Vec<Document>, AppError> {
        self.check()?;
        Ok(self.rows())
    }

    async fn update_document(
        &self,
        doc_id: &str,
        update: &DocumentUpdate,
    ) -> Result<u64, AppError> {
        self.check()?;
        let doc_id: i64 = doc_id.parse().map_err(|e| {
            AppError::QueryError(anyhow::anyhow!("invalid input syntax for type bigint: {}", e))
        })?;
        let mut rows = self.rows.lock().unwrap();
        let mut changed = 0;
        for row in rows.iter_mut().filter(|row| row.doc_id == doc_id) {
            *row = row.with_update(update);
            changed += 1;
        }
        Ok(changed)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check()
    }
}

pub fn doc(doc_id: i64, summary_json: &str, validation_status: &str) -> Document {
    Document {
        doc_id,
        summary_json: Some(summary_json.to_string()),
        validation_status: Some(validation_status.to_string()),
    }
}

/// Config from `APP__*`-style pairs on top of a random port and a database
/// that does not need to exist.
pub fn test_config(overrides: &[(&str, &str)]) -> DocConfig {
    let mut vars: HashMap<String, String> = [
        ("APP__PORT", "0"),
        ("APP__LOG_LEVEL", "warn"),
        ("APP__DATABASE__USER", "doc_test"),
        ("APP__DATABASE__NAME", "doc_test"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    DocConfig::from_environment(core_config::environment().source(Some(vars)))
        .expect("Failed to build test configuration")
}

/// Settings for the Postgres-backed tests, overridable with `TEST_DATABASE_*`.
pub fn test_database_vars() -> Vec<(String, String)> {
    let get = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
    vec![
        (
            "APP__DATABASE__HOST".to_string(),
            get("TEST_DATABASE_HOST", "localhost"),
        ),
        (
            "APP__DATABASE__PORT".to_string(),
            get("TEST_DATABASE_PORT", "5432"),
        ),
        (
            "APP__DATABASE__USER".to_string(),
            get("TEST_DATABASE_USER", "postgres"),
        ),
        (
            "APP__DATABASE__PASSWORD".to_string(),
            get("TEST_DATABASE_PASSWORD", "postgres"),
        ),
        (
            "APP__DATABASE__NAME".to_string(),
            get("TEST_DATABASE_NAME", "doc_test"),
        ),
    ]
}

/// Generate a unique schema name for test isolation.
pub fn unique_schema_name() -> String {
    let counter = SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("test_doc_{}_{}", std::process::id(), counter)
}

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the application on a random port with the given store.
    pub async fn spawn_with_store(store: Arc<dyn DocumentStore>) -> Self {
        init_metrics();

        let app = Application::build_with_store(test_config(&[]), store)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    /// Spawn the application against the database described by `config`.
    pub async fn spawn(config: DocConfig) -> Self {
        init_metrics();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the echo endpoint
        let client = reqwest::Client::new();
        let hello_url = format!("{}/api/hello", address);
        for _ in 0..50 {
            if client.get(&hello_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
