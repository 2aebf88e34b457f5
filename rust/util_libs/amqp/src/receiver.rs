use crate::{
    error::AmqpError,
    sender::declare_topology,
    types::{Event, CONSUMER_TAG},
};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use lapin::{options::BasicConsumeOptions, types::FieldTable, Channel, Connection};
use std::{fmt::Display, marker::PhantomData, sync::Arc, time::Duration};
use tokio::task::JoinHandle;

const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Business side of a receiver. Failures are the handler's to log; the
/// broker never sees them.
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync {
    async fn handle(&self, event: E);
}

/// A running consumer on one queue.
pub struct Receiver<E: Event> {
    channel: Channel,
    task: JoinHandle<()>,
    _event: PhantomData<E>,
}

impl<E: Event> Receiver<E> {
    /// Declares the event's topology, registers an auto-ack consumer and
    /// spawns the delivery loop.
    pub async fn start(
        connection: &Connection,
        handler: Arc<dyn EventHandler<E>>,
    ) -> Result<Self, AmqpError> {
        let topology = E::TOPOLOGY;
        let channel = connection
            .create_channel()
            .await
            .map_err(|err| AmqpError::broker("create channel", err))?;
        declare_topology(&channel, &topology).await?;

        let consumer = channel
            .basic_consume(
                topology.queue,
                CONSUMER_TAG,
                BasicConsumeOptions {
                    no_ack: true,
                    exclusive: false,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|err| AmqpError::broker(format!("consume {}", topology.queue), err))?;

        let deliveries = consumer.map(|delivery| delivery.map(|delivery| delivery.data));
        let status_channel = channel.clone();
        let task = tokio::spawn(async move {
            consume_deliveries(deliveries, move || status_channel.status().connected(), handler)
                .await;
        });

        log::info!("consuming {} from {}", E::NAME, topology.queue);
        Ok(Self {
            channel,
            task,
            _event: PhantomData,
        })
    }

    /// Closes the channel and waits for the delivery loop to notice.
    pub async fn stop(self) -> Result<(), AmqpError> {
        let queue = E::TOPOLOGY.queue;
        if self.channel.status().connected() {
            self.channel
                .close(200, "receiver stopped")
                .await
                .map_err(|err| AmqpError::broker(format!("close channel for {queue}"), err))?;
        }

        let mut task = self.task;
        if tokio::time::timeout(STOP_TIMEOUT, &mut task).await.is_err() {
            log::warn!("delivery loop for {queue} did not exit, aborting it");
            task.abort();
        }
        Ok(())
    }
}

/// Decodes each delivery and dispatches it to `handler` in arrival order.
///
/// The loop ends when the stream ends or `is_open` reports the channel closed.
/// Undecodable messages and delivery errors are logged and dropped.
pub async fn consume_deliveries<E, S, Err>(
    mut deliveries: S,
    is_open: impl Fn() -> bool,
    handler: Arc<dyn EventHandler<E>>,
) where
    E: Event,
    S: Stream<Item = Result<Vec<u8>, Err>> + Unpin,
    Err: Display,
{
    let queue = E::TOPOLOGY.queue;
    while let Some(delivery) = deliveries.next().await {
        if !is_open() {
            log::info!("channel for {queue} closed, stopping consumer");
            break;
        }

        let body = match delivery {
            Ok(body) => body,
            Err(err) => {
                log::error!("delivery error on {queue}: {err}");
                continue;
            }
        };

        match E::decode(&body) {
            Ok(event) => handler.handle(event).await,
            Err(err) => log::error!("{err}; message dropped"),
        }
    }
    log::info!("consumer for {queue} exited");
}
