use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::time::Duration;

/// Process-wide configuration, built once in `main` and passed down by reference.
#[derive(Debug, Clone, Deserialize)]
pub struct DocConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector for span export; unset disables export.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default)]
    pub http: HttpConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Largest accepted request body; bigger bodies are answered with 413.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

/// Connection settings and the pool/retry policy for the document database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    pub user: String,
    #[serde(default = "default_password")]
    pub password: Secret<String>,
    pub name: String,
    /// Sets the session `search_path` when present.
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub encrypt: bool,
    #[serde(default = "default_true")]
    pub trust_server_certificate: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Extra attempts after a failed session acquire. Zero disables retrying.
    #[serde(default)]
    pub acquire_retries: u32,
    #[serde(default = "default_retry_initial_backoff_ms")]
    pub retry_initial_backoff_ms: u64,
}

impl DatabaseConfig {
    pub fn ssl_mode(&self) -> PgSslMode {
        match (self.encrypt, self.trust_server_certificate) {
            (false, _) => PgSslMode::Disable,
            (true, true) => PgSslMode::Require,
            (true, false) => PgSslMode::VerifyFull,
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.name)
            .ssl_mode(self.ssl_mode());

        match &self.schema {
            Some(schema) => options.options([("search_path", schema.as_str())]),
            None => options,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn retry_initial_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_initial_backoff_ms)
    }
}

impl DocConfig {
    /// Load from `.env`, an optional `configuration.*` file and `APP__*` variables.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_environment(core_config::environment())
    }

    pub fn from_environment(environment: config::Environment) -> Result<Self, AppError> {
        let config = core_config::layered(environment).build()?;

        Ok(config.try_deserialize()?)
    }
}

fn default_service_name() -> String {
    "doc-service".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_body_limit_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_password() -> Secret<String> {
    Secret::new(String::new())
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    15
}

fn default_idle_timeout_secs() -> u64 {
    30
}

fn default_retry_initial_backoff_ms() -> u64 {
    100
}
