use api_utils::{ApiError, ServiceClient};
use async_trait::async_trait;
use serde::Deserialize;

/// Read access to the user service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn login_of(&self, user_id: &str) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
struct UserLogin {
    login: String,
}

pub struct HttpUserDirectory {
    client: ServiceClient,
}

impl HttpUserDirectory {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: ServiceClient::new(base_url)?,
        })
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn login_of(&self, user_id: &str) -> Result<String, ApiError> {
        let user: UserLogin = self
            .client
            .get_json("users", &[("id", user_id)], None)
            .await?;
        Ok(user.login)
    }
}
