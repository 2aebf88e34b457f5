use super::users_dto::RefreshRequest;
use crate::providers::tokens::TokenService;
use actix_web::{post, web, HttpResponse};
use api_utils::{parse_json_body, ApiError, Validate};

#[post("/users/refresh")]
pub async fn refresh(
    body: web::Bytes,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, ApiError> {
    let request: RefreshRequest = parse_json_body(&body)?;
    request.validate()?;

    Ok(HttpResponse::Ok().json(tokens.refresh(&request.refreshtoken)?))
}
