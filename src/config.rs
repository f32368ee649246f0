use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the cabinet gateway.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the document cabinet REST endpoint.
    pub cabinet_url: String,
    /// Username presented to the cabinet at logon.
    pub cabinet_username: String,
    /// Password presented to the cabinet at logon.
    pub cabinet_password: String,
    /// Identifier of the file cabinet all operations target.
    pub cabinet_id: String,
    /// Optional override for the listing page size (defaults to 1000).
    pub cabinet_page_size: Option<usize>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cabinet_url: load_env("CABINET_URL")?,
            cabinet_username: load_env("CABINET_USERNAME")?,
            cabinet_password: load_env("CABINET_PASSWORD")?,
            cabinet_id: load_env("CABINET_ID")?,
            cabinet_page_size: load_env_optional("CABINET_PAGE_SIZE")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("CABINET_PAGE_SIZE".to_string()))
                })
                .transpose()?,
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        cabinet_url = %config.cabinet_url,
        cabinet_id = %config.cabinet_id,
        page_size = ?config.cabinet_page_size,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
