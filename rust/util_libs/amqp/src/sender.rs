use crate::{
    error::AmqpError,
    types::{
        Event, NotificationMessage, NotificationType, Topology, UserDeleted, UserLoginChanged,
        BINDING_KEY, PUBLISH_TIMEOUT,
    },
};
use async_trait::async_trait;
use lapin::{
    options::{
        BasicPublishOptions, ConfirmSelectOptions, ExchangeDeclareOptions, QueueBindOptions,
        QueueDeclareOptions,
    },
    types::FieldTable,
    BasicProperties, Channel, Connection, ExchangeKind,
};
use std::{sync::Arc, time::Duration};

/// Declares the queue, the fanout exchange and the binding between them.
/// Declaring an existing topology with the same options is a no-op.
pub async fn declare_topology(channel: &Channel, topology: &Topology) -> Result<(), AmqpError> {
    channel
        .queue_declare(
            topology.queue,
            QueueDeclareOptions {
                durable: false,
                exclusive: false,
                auto_delete: false,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|err| AmqpError::broker(format!("declare queue {}", topology.queue), err))?;

    channel
        .exchange_declare(
            topology.exchange,
            ExchangeKind::Fanout,
            ExchangeDeclareOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(|err| AmqpError::broker(format!("declare exchange {}", topology.exchange), err))?;

    channel
        .queue_bind(
            topology.queue,
            topology.exchange,
            BINDING_KEY,
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(|err| AmqpError::broker(format!("bind queue {}", topology.queue), err))
}

/// Delivers an encoded body to a topology's exchange.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topology: &Topology, body: Vec<u8>) -> Result<(), AmqpError>;
}

/// Publishes with broker confirms, opening a fresh channel for every message.
pub struct AmqpPublisher {
    connection: Arc<Connection>,
    timeout: Duration,
}

impl AmqpPublisher {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            connection,
            timeout: PUBLISH_TIMEOUT,
        }
    }

    async fn publish_on(
        &self,
        channel: &Channel,
        topology: &Topology,
        body: &[u8],
    ) -> Result<(), AmqpError> {
        declare_topology(channel, topology).await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|err| AmqpError::broker("confirm select", err))?;

        let properties = BasicProperties::default().with_content_type(topology.content_type.into());
        let publish = async {
            channel
                .basic_publish(
                    topology.exchange,
                    "",
                    BasicPublishOptions::default(),
                    body,
                    properties,
                )
                .await?
                .await
        };

        let confirmation = tokio::time::timeout(self.timeout, publish)
            .await
            .map_err(|_| AmqpError::Timeout {
                exchange: topology.exchange.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|err| AmqpError::broker(format!("publish to {}", topology.exchange), err))?;

        if confirmation.is_nack() {
            return Err(AmqpError::Nack {
                exchange: topology.exchange.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Publisher for AmqpPublisher {
    async fn publish(&self, topology: &Topology, body: Vec<u8>) -> Result<(), AmqpError> {
        let channel = self
            .connection
            .create_channel()
            .await
            .map_err(|err| AmqpError::broker("create channel", err))?;

        let result = self.publish_on(&channel, topology, &body).await;

        if let Err(err) = channel.close(200, "publish done").await {
            log::warn!("failed to close publish channel for {}: {err}", topology.exchange);
        }
        result
    }
}

/// One operation per event type; each encodes its event and hands it to the
/// publisher.
#[derive(Clone)]
pub struct EventSender {
    publisher: Arc<dyn Publisher>,
}

impl EventSender {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self::with_publisher(Arc::new(AmqpPublisher::new(connection)))
    }

    pub fn with_publisher(publisher: Arc<dyn Publisher>) -> Self {
        Self { publisher }
    }

    pub async fn send<E: Event>(&self, event: &E) -> Result<(), AmqpError> {
        let body = event.encode()?;
        self.publisher.publish(&E::TOPOLOGY, body).await?;
        log::debug!("published {} to {}", E::NAME, E::TOPOLOGY.exchange);
        Ok(())
    }

    pub async fn user_login_changed(&self, userid: &str, newlogin: &str) -> Result<(), AmqpError> {
        self.send(&UserLoginChanged {
            userid: userid.to_string(),
            newlogin: newlogin.to_string(),
        })
        .await
    }

    pub async fn user_deleted(&self, userid: &str) -> Result<(), AmqpError> {
        self.send(&UserDeleted(userid.to_string())).await
    }

    pub async fn send_notification(
        &self,
        userid: &str,
        content: &str,
        kind: NotificationType,
    ) -> Result<(), AmqpError> {
        self.send(&NotificationMessage {
            userid: userid.to_string(),
            content: content.to_string(),
            kind,
        })
        .await
    }
}
