use crate::client::CALLER_HEADER;
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error,
};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// level; records emitted through the `log` facade are forwarded too.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Root span for a service process; every event logged inside it carries the
/// service name and the environment tag.
pub fn service_span(service: &str, environment: &str) -> tracing::Span {
    tracing::info_span!("service", name = service, environment = environment)
}

/// Request log line per call, for use with `actix_web::middleware::from_fn`.
pub async fn request_logging(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();
    let path = req.path().to_owned();
    let caller = req
        .headers()
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_owned();
    let started = Instant::now();

    let response = next.call(req).await;

    let status = match &response {
        Ok(response) => response.status().as_u16(),
        Err(err) => err.as_response_error().status_code().as_u16(),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status >= 500 {
        tracing::error!(%method, %path, status, elapsed_ms, caller = %caller, "request failed");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, caller = %caller, "request handled");
    }
    response
}
