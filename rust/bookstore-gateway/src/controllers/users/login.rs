use crate::providers::{tokens::TokenService, users_api::UsersApi};
use actix_web::{post, web, HttpResponse};
use api_utils::{parse_json_body, ApiError, Validate};
use users::dto::LoginRequest;

#[post("/users/login")]
pub async fn login(
    body: web::Bytes,
    users: web::Data<dyn UsersApi>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, ApiError> {
    let request: LoginRequest = parse_json_body(&body)?;
    request.validate()?;

    let user = users.login(&request).await?;
    Ok(HttpResponse::Ok().json(tokens.mint(&user)?))
}
