use amqp_utils::connection;
use anyhow::Context;
use api_utils::{logging, Shutdown};
use cache_utils::ByteCache;
use db_utils::{
    mongodb::MongoCollection,
    schemas::inbox::{Inbox, INBOX_COLLECTION_NAME},
};
use notifications::{
    config::Settings, directory::HttpUserDirectory, inbox::InboxStore, receivers::Receivers,
    NotificationService,
};
use std::sync::Arc;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let settings =
        notifications::config::load_config().context("failed to load notifications config")?;
    let span = logging::service_span("notifications", &settings.service.environment);
    run(settings).instrument(span).await
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let database = settings.db.connect().await?;
    let inboxes: Arc<dyn InboxStore> =
        Arc::new(MongoCollection::<Inbox>::new(&database, INBOX_COLLECTION_NAME).await?);
    let directory = Arc::new(HttpUserDirectory::new(&settings.service.srv_url_user)?);
    let known = Arc::new(ByteCache::new(settings.service.cache_size_mb * 1024 * 1024));
    let service = Arc::new(NotificationService::new(inboxes, directory, known));

    let broker = Arc::new(connection::connect(&settings.broker).await?);
    let receivers = Receivers::start(&broker, service).await?;
    tracing::info!("notification receivers started");

    let mut shutdown = Shutdown::new();
    shutdown.register("broker connection", move || async move {
        connection::close(&broker).await?;
        Ok(())
    });
    shutdown.register("receivers", move || async move {
        receivers.stop().await?;
        Ok(())
    });

    let failures = shutdown.wait_for_signal().await;
    tracing::info!("notification service stopped with {failures} shutdown failure(s)");
    Ok(())
}
