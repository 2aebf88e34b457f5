use api_utils::{ApiError, ServiceClient};
use async_trait::async_trait;
use users::dto::{ChangeLoginRequest, LoginRequest, RegisterRequest, UserSnapshot};

/// The calls the gateway makes to the user service.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<UserSnapshot, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<UserSnapshot, ApiError>;

    async fn change_login(
        &self,
        caller: &str,
        request: &ChangeLoginRequest,
    ) -> Result<UserSnapshot, ApiError>;

    async fn delete(&self, caller: &str) -> Result<(), ApiError>;
}

pub struct HttpUsersApi {
    client: ServiceClient,
}

impl HttpUsersApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: ServiceClient::new(base_url)?,
        })
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn login(&self, request: &LoginRequest) -> Result<UserSnapshot, ApiError> {
        self.client.post_json("users/login", request, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserSnapshot, ApiError> {
        self.client.post_json("users/register", request, None).await
    }

    async fn change_login(
        &self,
        caller: &str,
        request: &ChangeLoginRequest,
    ) -> Result<UserSnapshot, ApiError> {
        self.client.patch_json("users/login", request, Some(caller)).await
    }

    async fn delete(&self, caller: &str) -> Result<(), ApiError> {
        self.client.delete("users", Some(caller)).await
    }
}
