use actix_web::{middleware::from_fn, web, App, HttpServer};
use amqp_utils::{connection, EventSender};
use anyhow::Context;
use api_utils::{error::query_config, logging, Shutdown};
use db_utils::{mongodb::MongoCollection, schemas::user::{User, USER_COLLECTION_NAME}};
use std::sync::Arc;
use tracing::Instrument;
use users::{config::Settings, handlers, lifecycle, UserService, UserStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let settings = users::config::load_config().context("failed to load users config")?;
    let span = logging::service_span("users", &settings.service.environment);
    run(settings).instrument(span).await
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let database = settings.db.connect().await?;
    let store: Arc<dyn UserStore> =
        Arc::new(MongoCollection::<User>::new(&database, USER_COLLECTION_NAME).await?);

    let broker = Arc::new(connection::connect(&settings.broker).await?);
    let service = web::Data::new(UserService::new(
        store,
        EventSender::new(broker.clone()),
        settings.service.bcrypt_cost,
    ));
    service.seed_admin().await?;

    let server_service = service.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_service.clone())
            .app_data(query_config())
            .wrap(from_fn(logging::request_logging))
            .configure(handlers::setup_controllers)
    })
    .bind((settings.service.host.as_str(), settings.service.port))?
    .disable_signals()
    .run();

    tracing::info!(
        "users service listening on {}:{}",
        settings.service.host,
        settings.service.port
    );

    let mut shutdown = Shutdown::new();
    let handle = server.handle();
    lifecycle::register_closers(
        &mut shutdown,
        move || async move {
            handle.stop(true).await;
            Ok(())
        },
        move || async move {
            connection::close(&broker).await?;
            Ok(())
        },
    );

    let mut server_task = actix_web::rt::spawn(server);
    let failures = shutdown
        .wait_until(async {
            match (&mut server_task).await {
                Ok(Ok(())) => tracing::warn!("http server stopped on its own"),
                Ok(Err(err)) => tracing::error!("http server failed: {err}"),
                Err(err) => tracing::error!("http server task failed: {err}"),
            }
        })
        .await;

    tracing::info!("users service stopped with {failures} shutdown failure(s)");
    Ok(())
}
