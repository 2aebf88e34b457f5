use amqp_utils::NotificationType;
use bson::{doc, oid::ObjectId, Document, Timestamp};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::mongodb::traits::IntoIndexes;

pub const INBOX_COLLECTION_NAME: &str = "notifications";

/// One user's notifications, newest first.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Inbox {
    /// the owning user's id
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// copy of the user's login, kept in step by login-changed events
    pub login: String,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Inbox {
    pub fn new(id: ObjectId, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            notifications: vec![],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Notification {
    /// server time at the second; the increment is always 0
    pub sended: Timestamp,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

impl Notification {
    pub fn new(content: impl Into<String>, kind: NotificationType, sent_at_secs: u32) -> Self {
        Self {
            sended: Timestamp {
                time: sent_at_secs,
                increment: 0,
            },
            content: content.into(),
            kind,
        }
    }
}

impl IntoIndexes for Inbox {
    fn indexes() -> Vec<(Document, Option<IndexOptions>)> {
        let login_index_opts = IndexOptions::builder()
            .name(Some("login_index".to_string()))
            .build();
        vec![(doc! { "login": 1 }, Some(login_index_opts))]
    }
}
