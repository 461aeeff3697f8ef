use crate::error::AppError;
use config::{Config as Cfg, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::{Deserialize, Deserializer, de};

/// Environment variable prefix, e.g. `APP__PORT=3001`.
pub const ENV_PREFIX: &str = "APP";

/// Separator between prefix and nested keys, e.g. `APP__DATABASE__HOST`.
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
}

pub fn default_port() -> u16 {
    3001
}

/// Accepts the port as a number (config files) or as text (environment).
///
/// Service configs embed [`Config`] with `#[serde(flatten)]`, which hands the
/// field over as raw text instead of going through `config`'s own coercion.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid port: {text}"))),
    }
}

/// `APP__*` environment variables as a config source. Values stay strings;
/// typed fields are coerced on deserialization, so `0123` remains `0123`
/// for string settings.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

/// Builder with the sources every service reads: an optional `configuration.*`
/// file in the working directory, overridden by the given environment source.
pub fn layered(environment: Environment) -> ConfigBuilder<DefaultState> {
    Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(environment)
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = layered(environment()).build()?;

        Ok(config.try_deserialize()?)
    }
}
