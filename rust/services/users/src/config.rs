use amqp_utils::{config::BROKER_DEFAULTS, BrokerConfig};
use api_utils::config::load_settings;
use db_utils::{config::DB_DEFAULTS, DbConfig};
use serde::Deserialize;

pub const USERS_DEFAULTS: &[(&str, &str)] = &[("port", "8081"), ("bcrypt_cost", "10")];

#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    pub host: String,
    pub port: u16,
    /// tag attached to every log line
    pub environment: String,
    pub bcrypt_cost: u32,
}

/// Everything the users binary needs, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub service: UsersConfig,
    pub db: DbConfig,
    pub broker: BrokerConfig,
}

pub fn load_config() -> Result<Settings, config::ConfigError> {
    let defaults = [USERS_DEFAULTS, DB_DEFAULTS, BROKER_DEFAULTS].concat();
    let settings = load_settings(&defaults)?;
    Ok(Settings {
        service: settings.clone().try_deserialize()?,
        db: settings.clone().try_deserialize()?,
        broker: settings.try_deserialize()?,
    })
}
