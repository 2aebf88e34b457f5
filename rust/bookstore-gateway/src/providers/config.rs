use api_utils::config::load_settings;
use config::{Config, ConfigError};
use serde::Deserialize;

pub const GATEWAY_DEFAULTS: &[(&str, &str)] = &[
    ("srv_url_user", "http://localhost:8081"),
    ("srv_url_book", "http://localhost:8082"),
    ("srv_url_genre", "http://localhost:8083"),
    ("cache_size_mb", "64"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    /// port to run the server on
    pub port: u16,
    /// tag attached to every log line
    pub environment: String,
    /// secret used to sign access tokens
    pub jwt_secret: String,
    pub srv_url_user: String,
    pub srv_url_book: String,
    pub srv_url_genre: String,
    /// size of the refresh token cache
    pub cache_size_mb: usize,
}

impl GatewayConfig {
    pub fn cache_capacity(&self) -> usize {
        self.cache_size_mb.saturating_mul(1024 * 1024)
    }
}

pub fn load_config() -> Result<GatewayConfig, ConfigError> {
    from_settings(load_settings(GATEWAY_DEFAULTS)?)
}

/// Deserializes layered settings; a missing or blank `JWT_SECRET` is an error.
pub fn from_settings(settings: Config) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = settings.try_deserialize()?;
    if config.jwt_secret.trim().is_empty() {
        return Err(ConfigError::Message("JWT_SECRET must not be empty".to_string()));
    }
    Ok(config)
}
