use actix_web::{
    http::{header, StatusCode},
    web, HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};
use thiserror::Error;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Machine readable error codes shared by every service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter)]
pub enum ErrorCode {
    #[serde(rename = "IE-0001")]
    #[strum(serialize = "IE-0001")]
    Internal,
    #[serde(rename = "IE-0002")]
    #[strum(serialize = "IE-0002")]
    NotFound,
    #[serde(rename = "IE-0003")]
    #[strum(serialize = "IE-0003")]
    BadRequest,
    #[serde(rename = "IE-0004")]
    #[strum(serialize = "IE-0004")]
    Validation,
    #[serde(rename = "IE-0005")]
    #[strum(serialize = "IE-0005")]
    Unauthorized,
    #[serde(rename = "IE-0006")]
    #[strum(serialize = "IE-0006")]
    Conflict,
    #[serde(rename = "IE-0007")]
    #[strum(serialize = "IE-0007")]
    Forbidden,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Validation => StatusCode::NOT_IMPLEMENTED,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

/// The error envelope written on every failed request:
/// `{"code": "IE-0002", "messages": [...], "developer_message": "..."}`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}: {}", .code.as_ref(), .messages.join("; "))]
pub struct ApiError {
    pub code: ErrorCode,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub developer_message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, messages: Vec<String>, developer_message: impl Into<String>) -> Self {
        Self {
            code,
            messages,
            developer_message: developer_message.into(),
        }
    }

    pub fn internal(developer_message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::Internal,
            vec!["internal server error".to_string()],
            developer_message,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, vec![message.into()], "")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, vec![message.into()], "")
    }

    pub fn validation(messages: Vec<String>) -> Self {
        Self::new(ErrorCode::Validation, messages, "request validation failed")
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, vec![message.into()], "")
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, vec![message.into()], "")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, vec![message.into()], "")
    }

    pub fn with_developer_message(mut self, developer_message: impl Into<String>) -> Self {
        self.developer_message = developer_message.into();
        self
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.code.status()
    }

    fn error_response(&self) -> HttpResponse {
        let body = serde_json::to_string(self).unwrap_or_else(|err| {
            log::error!("failed to serialize error envelope: {err}");
            format!(r#"{{"code":"{}","messages":[],"developer_message":""}}"#, self.code.as_ref())
        });
        HttpResponse::build(self.status_code())
            .insert_header((header::CONTENT_TYPE, CONTENT_TYPE_JSON))
            .body(body)
    }
}

/// Errors that are not already an envelope become `internal`; an envelope
/// wrapped inside an `anyhow::Error` keeps its code.
impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        match value.downcast::<ApiError>() {
            Ok(api_error) => api_error,
            Err(other) => ApiError::internal(format!("{other:#}")),
        }
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(value: mongodb::error::Error) -> Self {
        if is_duplicate_key(&value) {
            return ApiError::conflict("document already exists")
                .with_developer_message(value.to_string());
        }
        ApiError::internal(format!("database error: {value}"))
    }
}

impl From<bson::ser::Error> for ApiError {
    fn from(value: bson::ser::Error) -> Self {
        ApiError::internal(format!("bson serialization error: {value}"))
    }
}

impl From<bson::de::Error> for ApiError {
    fn from(value: bson::de::Error) -> Self {
        ApiError::internal(format!("bson deserialization error: {value}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::internal(format!("json error: {value}"))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::internal(format!("downstream request failed: {value}"))
    }
}

/// Mongo reports unique index violations with server code 11000.
pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

/// Query extractor config whose failures render as `bad_request` envelopes.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError::bad_request("malformed query string")
            .with_developer_message(err.to_string())
            .into()
    })
}
