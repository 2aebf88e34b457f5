use crate::error::ApiError;
use bytes::Bytes;
use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

/// Header carrying the authenticated caller id between services. Only the
/// gateway sets it; downstream services trust it.
pub const CALLER_HEADER: &str = "User";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw downstream response, used when the gateway relays a body verbatim.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Small JSON client for calls between services.
///
/// Every request is bounded by the client timeout. Failed responses that carry
/// an error envelope keep their code; anything else becomes `internal`.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ServiceClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        // a trailing slash keeps the base path when joining relative paths
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base)
            .map_err(|err| ApiError::internal(format!("invalid service url {base}: {err}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::internal(format!("invalid path {path}: {err}")))
    }

    pub fn request(
        &self,
        method: Method,
        path: &str,
        caller: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let mut builder = self.http.request(method, self.url(path)?);
        if let Some(caller) = caller {
            builder = builder.header(CALLER_HEADER, caller);
        }
        Ok(builder)
    }

    pub async fn get_json<T, Q>(&self, path: &str, query: &Q, caller: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path, caller)?.query(query);
        Self::send_json(builder).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B, caller: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, caller)?.json(body);
        Self::send_json(builder).await
    }

    pub async fn patch_json<T, B>(&self, path: &str, body: &B, caller: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PATCH, path, caller)?.json(body);
        Self::send_json(builder).await
    }

    pub async fn delete(&self, path: &str, caller: Option<&str>) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path, caller)?.send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Relays a request body as-is and returns the downstream body as-is.
    /// Failed downstream responses are still mapped to an error envelope.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        content_type: Option<&str>,
        body: Bytes,
        caller: Option<&str>,
    ) -> Result<ForwardedResponse, ApiError> {
        let mut url = self.url(path)?;
        url.set_query(query.filter(|q| !q.is_empty()));

        let mut builder = self.http.request(method, url).body(body);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(caller) = caller {
            builder = builder.header(CALLER_HEADER, caller);
        }

        let response = Self::check_status(builder.send().await?).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check_status(builder.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| {
            ApiError::internal(format!("failed to decode downstream response: {err}"))
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = response.bytes().await.unwrap_or_default();
        Err(error_from_response(status, &body, &url))
    }
}

/// Maps a failed downstream response to an envelope, keeping the downstream
/// code when the body is itself an envelope.
pub fn error_from_response(status: StatusCode, body: &[u8], url: &Url) -> ApiError {
    match serde_json::from_slice::<ApiError>(body) {
        Ok(envelope) => envelope,
        Err(_) => ApiError::internal(format!(
            "{url} responded with {status}: {}",
            String::from_utf8_lossy(body)
        )),
    }
}
