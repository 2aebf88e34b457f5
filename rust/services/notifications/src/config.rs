use amqp_utils::{config::BROKER_DEFAULTS, BrokerConfig};
use api_utils::config::load_settings;
use db_utils::{config::DB_DEFAULTS, DbConfig};
use serde::Deserialize;

pub const NOTIFICATIONS_DEFAULTS: &[(&str, &str)] = &[
    ("srv_url_user", "http://localhost:8081"),
    ("cache_size_mb", "64"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    pub environment: String,
    /// base url of the user service, used to read logins for new inboxes
    pub srv_url_user: String,
    pub cache_size_mb: usize,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub service: NotificationsConfig,
    pub db: DbConfig,
    pub broker: BrokerConfig,
}

pub fn load_config() -> Result<Settings, config::ConfigError> {
    let defaults = [NOTIFICATIONS_DEFAULTS, DB_DEFAULTS, BROKER_DEFAULTS].concat();
    let settings = load_settings(&defaults)?;
    Ok(Settings {
        service: settings.clone().try_deserialize()?,
        db: settings.clone().try_deserialize()?,
        broker: settings.try_deserialize()?,
    })
}
