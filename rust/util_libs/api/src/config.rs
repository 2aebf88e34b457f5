use config::{Config, ConfigError, Environment};

/// Location of the per-service env file, relative to the working directory.
pub const ENV_FILE: &str = "config/.env";

/// Defaults every service shares.
pub const COMMON_DEFAULTS: &[(&str, &str)] = &[
    ("host", "0.0.0.0"),
    ("port", "8080"),
    ("environment", "debug"),
];

/// Loads `config/.env` into the process environment (a missing file is not an
/// error), then layers `defaults` under the environment variables.
///
/// Keys are lower-cased, so `DB_HOST` is read as `db_host`. Deserialize the
/// returned settings into each service's own config struct.
pub fn load_settings(defaults: &[(&str, &str)]) -> Result<Config, ConfigError> {
    if let Err(err) = dotenvy::from_filename(ENV_FILE) {
        log::debug!("no env file loaded from {ENV_FILE}: {err}");
    }

    let mut builder = Config::builder();
    for (key, value) in COMMON_DEFAULTS.iter().chain(defaults) {
        builder = builder.set_default(*key, *value)?;
    }
    builder.add_source(Environment::default()).build()
}
