use api_utils::{ApiError, Rule, Validate, Validator};
use db_utils::schemas::user::User;
use serde::{Deserialize, Serialize};

const LOGIN_RULES: &[Rule] = &[Rule::Required, Rule::Min(3), Rule::Max(32), Rule::OnlyEnglish];
const PASSWORD_RULES: &[Rule] = &[Rule::Required, Rule::Min(5), Rule::Max(64)];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("login", &self.login, &[Rule::Required])
            .field("password", &self.password, &[Rule::Required])
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("login", &self.login, LOGIN_RULES)
            .field("password", &self.password, PASSWORD_RULES)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeLoginRequest {
    #[serde(default)]
    pub login: String,
}

impl Validate for ChangeLoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("login", &self.login, LOGIN_RULES)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub id: String,
}

impl Validate for UserQuery {
    fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .field("id", &self.id, &[Rule::Required, Rule::PrimitiveId])
            .finish()
    }
}

/// The public view of a user; also what the gateway binds to a refresh token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            login: user.login.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
        }
    }
}
