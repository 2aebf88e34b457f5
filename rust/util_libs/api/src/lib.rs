//! Shared plumbing for every bookstore service: the error envelope, request
//! validation, configuration and logging bootstrap, graceful shutdown and the
//! inter-service REST client.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod shutdown;
pub mod validation;

#[cfg(test)]
mod tests;

pub use client::{ServiceClient, CALLER_HEADER};
pub use error::{ApiError, ErrorCode};
pub use shutdown::Shutdown;
pub use validation::{parse_json_body, Rule, Validate, Validator};
