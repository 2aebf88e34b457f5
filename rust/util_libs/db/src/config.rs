use crate::error::DbError;
use mongodb::{
    options::{ClientOptions, Credential},
    Client, Database,
};
use serde::Deserialize;
use std::time::Duration;

/// Defaults layered under the `DB_*` environment variables.
pub const DB_DEFAULTS: &[(&str, &str)] = &[
    ("db_host", "localhost"),
    ("db_port", "27017"),
    ("db_base", "bookstore"),
    ("db_name", ""),
    ("db_pass", ""),
    ("db_authdb", "admin"),
];

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub db_host: String,
    pub db_port: u16,
    /// database holding the service's collections
    pub db_base: String,
    /// user name; the connection is anonymous when this or the password is empty
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub db_pass: String,
    #[serde(default)]
    pub db_authdb: String,
}

impl DbConfig {
    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.db_host, self.db_port)
    }

    pub fn is_anonymous(&self) -> bool {
        self.db_name.is_empty() || self.db_pass.is_empty()
    }

    pub fn credential(&self) -> Option<Credential> {
        if self.is_anonymous() {
            return None;
        }
        let source = (!self.db_authdb.is_empty()).then(|| self.db_authdb.clone());
        Some(
            Credential::builder()
                .username(self.db_name.clone())
                .password(self.db_pass.clone())
                .source(source)
                .build(),
        )
    }

    /// Connects and pings the server so a bad address fails at startup.
    pub async fn connect(&self) -> Result<Database, DbError> {
        let mut options = ClientOptions::parse(self.uri())
            .await
            .map_err(|e| DbError::database("parse options", e))?;
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        options.server_selection_timeout = Some(CONNECT_TIMEOUT);
        options.credential = self.credential();

        let client =
            Client::with_options(options).map_err(|e| DbError::database("create client", e))?;
        let database = client.database(&self.db_base);
        database
            .run_command(bson::doc! { "ping": 1 })
            .await
            .map_err(|e| DbError::database("ping", e))?;

        log::info!(
            "connected to mongodb {}:{}/{} ({})",
            self.db_host,
            self.db_port,
            self.db_base,
            if self.is_anonymous() { "anonymous" } else { "authenticated" }
        );
        Ok(database)
    }
}
