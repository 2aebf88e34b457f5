use actix_web::{middleware::from_fn, web, App, HttpServer};
use anyhow::Context;
use api_utils::{error::query_config, logging, Shutdown};
use cache_utils::ByteCache;
use providers::{
    config::GatewayConfig,
    downstream::Downstream,
    tokens::TokenService,
    users_api::{HttpUsersApi, UsersApi},
};
use std::sync::Arc;
use tracing::Instrument;

mod controllers;
mod middleware;
mod providers;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = providers::config::load_config().context("failed to load gateway config")?;
    let span = logging::service_span("gateway", &config.environment);
    run(config).instrument(span).await
}

async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let cache = Arc::new(ByteCache::new(config.cache_capacity()));
    let tokens = web::Data::new(TokenService::new(config.jwt_secret.clone(), cache));
    let users_api: Arc<dyn UsersApi> = Arc::new(HttpUsersApi::new(&config.srv_url_user)?);
    let users_api = web::Data::from(users_api);
    let downstream = web::Data::new(Downstream::new(&config)?);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(tokens.clone())
            .app_data(users_api.clone())
            .app_data(downstream.clone())
            .app_data(query_config())
            .wrap(from_fn(logging::request_logging))
            .service(web::scope("/api/v1").configure(controllers::setup_controllers))
    })
    .bind((config.host.as_str(), config.port))?
    .disable_signals()
    .run();

    tracing::info!("gateway listening on {}:{}", config.host, config.port);

    let mut shutdown = Shutdown::new();
    let handle = server.handle();
    shutdown.register("http server", move || async move {
        handle.stop(true).await;
        Ok(())
    });

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

    tracing::info!("gateway stopped with {failures} shutdown failure(s)");
    Ok(())
}
