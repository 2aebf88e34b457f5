use crate::{
    dto::{ChangeLoginRequest, LoginRequest, RegisterRequest, UserSnapshot},
    store::UserStore,
};
use amqp_utils::{EventSender, NotificationType};
use api_utils::{ApiError, Validate};
use bson::oid::ObjectId;
use db_utils::schemas::user::{User, ROLE_ADMIN, ROLE_USER};
use std::sync::Arc;

pub const ADMIN_LOGIN: &str = "admin";
const ADMIN_PASSWORD: &str = "admin";

pub struct UserService {
    store: Arc<dyn UserStore>,
    events: EventSender,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, events: EventSender, bcrypt_cost: u32) -> Self {
        Self {
            store,
            events,
            bcrypt_cost,
        }
    }

    /// Checks credentials. Unknown logins and wrong passwords both answer
    /// `not_found`.
    pub async fn login(&self, request: &LoginRequest) -> Result<UserSnapshot, ApiError> {
        request.validate()?;

        let user = self
            .store
            .find_by_login(&request.login)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))?;

        let hash = user
            .password_hash()
            .ok_or_else(|| ApiError::internal(format!("stored hash of {} is not utf-8", user.login)))?;
        let matches = bcrypt::verify(&request.password, hash)
            .map_err(|err| ApiError::internal(format!("bcrypt verify failed: {err}")))?;
        if !matches {
            return Err(ApiError::not_found("user not found"));
        }

        Ok(UserSnapshot::from(&user))
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserSnapshot, ApiError> {
        request.validate()?;

        if self.store.find_by_login(&request.login).await?.is_some() {
            return Err(ApiError::conflict("login is already taken"));
        }

        let mut user = User::new(&request.login, &self.hash(&request.password)?, &[ROLE_USER]);
        user.id = Some(self.store.insert(user.clone()).await?);
        log::info!("registered user {}", request.login);
        Ok(UserSnapshot::from(&user))
    }

    pub async fn get(&self, id: &str) -> Result<UserSnapshot, ApiError> {
        let id = ObjectId::parse_str(id)
            .map_err(|_| ApiError::bad_request("id must be a valid object id"))?;
        let user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        Ok(UserSnapshot::from(&user))
    }

    /// Renames the caller, then announces the change and warns the user with
    /// a security notification.
    pub async fn change_login(
        &self,
        caller: ObjectId,
        request: &ChangeLoginRequest,
    ) -> Result<UserSnapshot, ApiError> {
        request.validate()?;

        let mut user = self
            .store
            .find_by_id(caller)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        if user.login == request.login {
            return Ok(UserSnapshot::from(&user));
        }
        if self.store.find_by_login(&request.login).await?.is_some() {
            return Err(ApiError::conflict("login is already taken"));
        }
        if !self.store.update_login(caller, &request.login).await? {
            return Err(ApiError::not_found("user not found"));
        }
        user.login = request.login.clone();

        let userid = caller.to_hex();
        if let Err(err) = self.events.user_login_changed(&userid, &user.login).await {
            log::error!("failed to publish login change of {userid}: {err}");
        }
        let content = format!("your login was changed to {}", user.login);
        if let Err(err) = self
            .events
            .send_notification(&userid, &content, NotificationType::Security)
            .await
        {
            log::error!("failed to notify {userid} about login change: {err}");
        }

        Ok(UserSnapshot::from(&user))
    }

    pub async fn delete(&self, caller: ObjectId) -> Result<(), ApiError> {
        if !self.store.delete(caller).await? {
            return Err(ApiError::not_found("user not found"));
        }

        let userid = caller.to_hex();
        log::info!("deleted user {userid}");
        if let Err(err) = self.events.user_deleted(&userid).await {
            log::error!("failed to publish deletion of {userid}: {err}");
        }
        Ok(())
    }

    /// Creates the `admin` account unless one already exists.
    pub async fn seed_admin(&self) -> Result<(), ApiError> {
        if self.store.find_by_login(ADMIN_LOGIN).await?.is_some() {
            return Ok(());
        }
        let admin = User::new(
            ADMIN_LOGIN,
            &self.hash(ADMIN_PASSWORD)?,
            &[ROLE_USER, ROLE_ADMIN],
        );
        match self.store.insert(admin).await {
            Ok(id) => {
                log::info!("seeded admin user {id}");
                Ok(())
            }
            // another instance seeded it first
            Err(err) if err.is(api_utils::ErrorCode::Conflict) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn hash(&self, password: &str) -> Result<String, ApiError> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|err| ApiError::internal(format!("bcrypt hash failed: {err}")))
    }
}
