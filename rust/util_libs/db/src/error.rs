use api_utils::{error::is_duplicate_key, ApiError};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DbError {
    #[error("Database error during {operation}: {source}")]
    Database {
        operation: String,
        source: mongodb::error::Error,
    },

    #[error("Internal error during {operation}: {message}")]
    Internal { operation: String, message: String },
}

impl DbError {
    pub fn database(operation: impl Into<String>, source: mongodb::error::Error) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    pub fn internal(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// True when the write violated a unique index.
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            Self::Database { source, .. } => is_duplicate_key(source),
            Self::Internal { .. } => false,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        if value.is_duplicate_key() {
            return ApiError::conflict("document already exists")
                .with_developer_message(value.to_string());
        }
        ApiError::internal(value.to_string())
    }
}
