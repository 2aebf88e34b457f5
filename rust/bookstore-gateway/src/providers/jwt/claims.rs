use serde::{Deserialize, Serialize};

/// Audience every access token is issued for.
pub const AUDIENCE: &str = "users";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessTokenClaims {
    /// user id
    pub id: String,
    pub aud: Vec<String>,
    /// unix seconds
    pub exp: usize,
    pub login: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl AccessTokenClaims {
    pub fn has_any_role(&self, required: &[String]) -> bool {
        self.roles.iter().any(|role| required.contains(role))
    }
}
