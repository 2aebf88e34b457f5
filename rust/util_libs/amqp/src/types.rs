use crate::error::AmqpError;
use api_utils::{ApiError, Rule, Validate, Validator};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Binding key used for every queue/exchange pair. Fanout exchanges ignore
/// it, but it is part of the declared topology.
pub const BINDING_KEY: &str = "#";
/// Consumer tag every receiver registers with.
pub const CONSUMER_TAG: &str = "NotificationAPI";
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Names and body format of one event's exchange and queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub exchange: &'static str,
    pub queue: &'static str,
    pub content_type: &'static str,
}

pub const USER_LOGIN_CHANGED: Topology = Topology {
    exchange: "UserLoginChangedExchange",
    queue: "UserLoginChangedQueue",
    content_type: CONTENT_TYPE_JSON,
};

pub const USER_DELETED: Topology = Topology {
    exchange: "UserDeletedExchange",
    queue: "UserDeletedQueue",
    content_type: CONTENT_TYPE_TEXT,
};

pub const NOTIFICATION_SEND: Topology = Topology {
    exchange: "notifications_exchange",
    queue: "NotificationReceiverQuery",
    content_type: CONTENT_TYPE_JSON,
};

/// A message with a fixed wire contract and topology.
pub trait Event: Serialize + DeserializeOwned + Send + Sync + 'static {
    const NAME: &'static str;
    const TOPOLOGY: Topology;

    fn encode(&self) -> Result<Vec<u8>, AmqpError> {
        serde_json::to_vec(self).map_err(|source| AmqpError::Encode {
            event: Self::NAME,
            source,
        })
    }

    fn decode(body: &[u8]) -> Result<Self, AmqpError> {
        serde_json::from_slice(body).map_err(|source| AmqpError::Decode {
            queue: Self::TOPOLOGY.queue,
            source,
        })
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Info,
    Warn,
    Security,
}

/// `{"userid":"<hex>","content":"<str>","type":"info"|"warn"|"security"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub userid: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

impl Event for NotificationMessage {
    const NAME: &'static str = "notification-send";
    const TOPOLOGY: Topology = NOTIFICATION_SEND;
}

impl Validate for NotificationMessage {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("userid", &self.userid, &[Rule::Required, Rule::PrimitiveId])
            .field("content", &self.content, &[Rule::Required])
            .finish()
    }
}

/// `{"userid":"<hex>","newlogin":"<str>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoginChanged {
    pub userid: String,
    pub newlogin: String,
}

impl Event for UserLoginChanged {
    const NAME: &'static str = "user-login-changed";
    const TOPOLOGY: Topology = USER_LOGIN_CHANGED;
}

impl Validate for UserLoginChanged {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("userid", &self.userid, &[Rule::Required, Rule::PrimitiveId])
            .field("newlogin", &self.newlogin, &[Rule::Required])
            .finish()
    }
}

/// The deleted user's id, sent as a quoted JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDeleted(pub String);

impl Event for UserDeleted {
    const NAME: &'static str = "user-deleted";
    const TOPOLOGY: Topology = USER_DELETED;
}

impl Validate for UserDeleted {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("userid", &self.0, &[Rule::Required, Rule::PrimitiveId])
            .finish()
    }
}
