use super::genres_dto::CreateGenreRequest;
use crate::{
    middleware::auth::{claims_of, Authentication},
    providers::downstream::{relay, Downstream},
};
use actix_web::{post, web, HttpRequest, HttpResponse};
use api_utils::{parse_json_body, ApiError, Validate};
use bytes::Bytes;
use db_utils::schemas::user::ROLE_ADMIN;

#[post("/genres", wrap = "Authentication::with_roles(&[ROLE_ADMIN])")]
pub async fn create_genre(
    req: HttpRequest,
    body: web::Bytes,
    downstream: web::Data<Downstream>,
) -> Result<HttpResponse, ApiError> {
    let claims = claims_of(&req)?;
    let request: CreateGenreRequest = parse_json_body(&body)?;
    request.validate()?;

    let response = downstream
        .genres
        .forward(
            reqwest::Method::POST,
            "genres",
            None,
            Some("application/json"),
            Bytes::from(serde_json::to_vec(&request)?),
            Some(&claims.id),
        )
        .await?;
    Ok(relay(response))
}
