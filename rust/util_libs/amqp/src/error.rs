use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmqpError {
    #[error("Broker error during {operation}: {source}")]
    Broker {
        operation: String,
        source: lapin::Error,
    },

    #[error("Publish to {exchange} timed out after {timeout:?}")]
    Timeout { exchange: String, timeout: Duration },

    #[error("Publish to {exchange} was rejected by the broker")]
    Nack { exchange: String },

    #[error("Failed to encode {event}: {source}")]
    Encode {
        event: &'static str,
        source: serde_json::Error,
    },

    #[error("Failed to decode message from {queue}: {source}")]
    Decode {
        queue: &'static str,
        source: serde_json::Error,
    },

    #[error("Invalid broker configuration: {message}")]
    Config { message: String },
}

impl AmqpError {
    /// Wraps a lapin error with the operation that produced it.
    pub fn broker(operation: impl Into<String>, source: lapin::Error) -> Self {
        Self::Broker {
            operation: operation.into(),
            source,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
