use crate::providers::jwt::{sign_access_token, verify_access_token, AccessTokenClaims, AUDIENCE};
use api_utils::ApiError;
use cache_utils::ByteCache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use users::dto::UserSnapshot;
use uuid::Uuid;

pub const ACCESS_TOKEN_TTL_SECS: usize = 60 * 60;
pub const REFRESH_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Body returned by login, register and refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub login: String,
    pub roles: Vec<String>,
    pub token: String,
    pub refreshtoken: String,
}

pub fn unix_now() -> usize {
    usize::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

fn refresh_key(id: &Uuid) -> String {
    format!("refresh:{id}")
}

/// Issues access tokens and single-use refresh tokens.
///
/// A refresh token is a random UUID keyed in the process-local cache to the
/// snapshot it was minted for, so a restart invalidates every refresh token.
pub struct TokenService {
    secret: String,
    cache: Arc<ByteCache>,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, cache: Arc<ByteCache>) -> Self {
        Self {
            secret: secret.into(),
            cache,
        }
    }

    pub fn mint(&self, user: &UserSnapshot) -> Result<TokenPair, ApiError> {
        let claims = AccessTokenClaims {
            id: user.id.clone(),
            aud: vec![AUDIENCE.to_string()],
            exp: unix_now() + ACCESS_TOKEN_TTL_SECS,
            login: user.login.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
        };
        let token = sign_access_token(&claims, &self.secret)
            .map_err(|err| ApiError::internal(format!("failed to sign access token: {err}")))?;

        let refresh_id = Uuid::new_v4();
        let snapshot = serde_json::to_vec(user)?;
        self.cache
            .set(&refresh_key(&refresh_id), &snapshot, REFRESH_TOKEN_TTL_SECS)
            .map_err(|err| ApiError::internal(format!("failed to store refresh token: {err}")))?;

        Ok(TokenPair {
            login: user.login.clone(),
            roles: user.roles.clone(),
            token,
            refreshtoken: refresh_id.to_string(),
        })
    }

    /// Consumes `refresh_token` and mints a new pair for the snapshot bound
    /// to it. A consumed, expired or unknown token is `not_found`.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let id = Uuid::parse_str(refresh_token)
            .ok()
            .filter(|id| id.hyphenated().to_string() == refresh_token)
            .ok_or_else(|| ApiError::not_found("refresh token not found"))?;

        let snapshot = self
            .cache
            .take(&refresh_key(&id))
            .ok_or_else(|| ApiError::not_found("refresh token not found"))?;
        let user: UserSnapshot = serde_json::from_slice(&snapshot)?;
        self.mint(&user)
    }

    /// Checks signature, audience and expiry.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, ApiError> {
        let claims = verify_access_token(token, &self.secret).map_err(|err| {
            ApiError::unauthorized("invalid token").with_developer_message(err.to_string())
        })?;
        if claims.exp <= unix_now() {
            return Err(ApiError::unauthorized("token expired"));
        }
        Ok(claims)
    }
}
