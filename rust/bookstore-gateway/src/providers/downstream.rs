use super::config::GatewayConfig;
use actix_web::{http::StatusCode, HttpResponse};
use api_utils::{client::ForwardedResponse, ApiError, ServiceClient};

/// Clients of the services the gateway only relays to.
pub struct Downstream {
    pub books: ServiceClient,
    pub genres: ServiceClient,
}

impl Downstream {
    pub fn new(config: &GatewayConfig) -> Result<Self, ApiError> {
        Ok(Self {
            books: ServiceClient::new(&config.srv_url_book)?,
            genres: ServiceClient::new(&config.srv_url_genre)?,
        })
    }
}

/// Writes a downstream response back unchanged.
pub fn relay(response: ForwardedResponse) -> HttpResponse {
    let status = StatusCode::from_u16(response.status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = HttpResponse::build(status);
    if let Some(content_type) = response.content_type {
        builder.content_type(content_type);
    }
    builder.body(response.body)
}
