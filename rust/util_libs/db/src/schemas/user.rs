use bson::{doc, oid::ObjectId, spec::BinarySubtype, Binary, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::mongodb::traits::IntoIndexes;

/// Collection name for user documents
pub const USER_COLLECTION_NAME: &str = "users";

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// `{_id, login, password: <bcrypt hash bytes>, email, email_confirmed, roles}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub login: String,
    /// bcrypt hash, stored as generic binary
    pub password: Binary,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_confirmed: bool,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(login: &str, password_hash: &str, roles: &[&str]) -> Self {
        Self {
            id: None,
            login: login.to_string(),
            password: Binary {
                subtype: BinarySubtype::Generic,
                bytes: password_hash.as_bytes().to_vec(),
            },
            email: String::new(),
            email_confirmed: false,
            roles: roles.iter().map(|role| role.to_string()).collect(),
        }
    }

    /// The stored bcrypt hash as text; `None` when the bytes are not UTF-8.
    pub fn password_hash(&self) -> Option<&str> {
        std::str::from_utf8(&self.password.bytes).ok()
    }
}

impl IntoIndexes for User {
    fn indexes() -> Vec<(Document, Option<IndexOptions>)> {
        let login_index_opts = IndexOptions::builder()
            .name(Some("login_unique".to_string()))
            .unique(Some(true))
            .build();
        vec![(doc! { "login": 1 }, Some(login_index_opts))]
    }
}
