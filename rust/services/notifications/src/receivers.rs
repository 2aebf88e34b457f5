use crate::service::NotificationService;
use amqp_utils::{
    AmqpError, EventHandler, NotificationMessage, Receiver, UserDeleted, UserLoginChanged,
};
use async_trait::async_trait;
use lapin::Connection;
use std::{future::Future, sync::Arc, time::Duration};

/// Deadline for handling one delivery.
pub const HANDLER_TIMEOUT: Duration = Duration::from_secs(10);

/// What the notification-send consumer needs.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send_notification(&self, msg: NotificationMessage);
}

/// What the user-deleted consumer needs.
#[async_trait]
pub trait UserDeletedSink: Send + Sync {
    async fn on_user_deleted(&self, event: UserDeleted);
}

/// What the user-login-changed consumer needs.
#[async_trait]
pub trait LoginChangedSink: Send + Sync {
    async fn on_user_login_changed(&self, event: UserLoginChanged);
}

#[async_trait]
impl NotificationSink for NotificationService {
    async fn send_notification(&self, msg: NotificationMessage) {
        NotificationService::send_notification(self, msg).await
    }
}

#[async_trait]
impl UserDeletedSink for NotificationService {
    async fn on_user_deleted(&self, event: UserDeleted) {
        NotificationService::on_user_deleted(self, event).await
    }
}

#[async_trait]
impl LoginChangedSink for NotificationService {
    async fn on_user_login_changed(&self, event: UserLoginChanged) {
        NotificationService::on_user_login_changed(self, event).await
    }
}

async fn with_deadline(queue: &str, handling: impl Future<Output = ()>) {
    if tokio::time::timeout(HANDLER_TIMEOUT, handling).await.is_err() {
        log::error!("handler for {queue} timed out after {HANDLER_TIMEOUT:?}");
    }
}

pub struct NotificationSendConsumer(pub Arc<dyn NotificationSink>);

#[async_trait]
impl EventHandler<NotificationMessage> for NotificationSendConsumer {
    async fn handle(&self, event: NotificationMessage) {
        with_deadline("notification-send", self.0.send_notification(event)).await
    }
}

pub struct UserDeletedConsumer(pub Arc<dyn UserDeletedSink>);

#[async_trait]
impl EventHandler<UserDeleted> for UserDeletedConsumer {
    async fn handle(&self, event: UserDeleted) {
        with_deadline("user-deleted", self.0.on_user_deleted(event)).await
    }
}

pub struct LoginChangedConsumer(pub Arc<dyn LoginChangedSink>);

#[async_trait]
impl EventHandler<UserLoginChanged> for LoginChangedConsumer {
    async fn handle(&self, event: UserLoginChanged) {
        with_deadline("user-login-changed", self.0.on_user_login_changed(event)).await
    }
}

/// The three running consumers.
pub struct Receivers {
    notifications: Receiver<NotificationMessage>,
    deletions: Receiver<UserDeleted>,
    login_changes: Receiver<UserLoginChanged>,
}

impl Receivers {
    pub async fn start(
        connection: &Connection,
        service: Arc<NotificationService>,
    ) -> Result<Self, AmqpError> {
        Ok(Self {
            notifications: Receiver::start(
                connection,
                Arc::new(NotificationSendConsumer(service.clone())),
            )
            .await?,
            deletions: Receiver::start(connection, Arc::new(UserDeletedConsumer(service.clone())))
                .await?,
            login_changes: Receiver::start(connection, Arc::new(LoginChangedConsumer(service)))
                .await?,
        })
    }

    /// Stops every consumer, reporting the first failure.
    pub async fn stop(self) -> Result<(), AmqpError> {
        let results = [
            self.notifications.stop().await,
            self.deletions.stop().await,
            self.login_changes.stop().await,
        ];
        results.into_iter().collect()
    }
}
