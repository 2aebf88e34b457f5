use crate::{
    middleware::auth::claims_of,
    providers::downstream::{relay, Downstream},
};
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use api_utils::ApiError;

/// Relays the multipart upload (name, authorid, genres, year, pages, file,
/// cover) to the book service untouched.
pub async fn add_book(
    req: HttpRequest,
    body: web::Bytes,
    downstream: web::Data<Downstream>,
) -> Result<HttpResponse, ApiError> {
    let claims = claims_of(&req)?;
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| value.starts_with("multipart/form-data"))
        .ok_or_else(|| ApiError::bad_request("multipart form data is required"))?;

    let response = downstream
        .books
        .forward(
            reqwest::Method::POST,
            "books",
            None,
            Some(content_type),
            body,
            Some(&claims.id),
        )
        .await?;
    Ok(relay(response))
}
