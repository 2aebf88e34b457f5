use crate::providers::{tokens::TokenService, users_api::UsersApi};
use actix_web::{post, web, HttpResponse};
use api_utils::{parse_json_body, ApiError, Validate};
use users::dto::RegisterRequest;

/// Creates the account and signs the new user in.
#[post("/users/register")]
pub async fn register(
    body: web::Bytes,
    users: web::Data<dyn UsersApi>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, ApiError> {
    let request: RegisterRequest = parse_json_body(&body)?;
    request.validate()?;

    let user = users.register(&request).await?;
    Ok(HttpResponse::Ok().json(tokens.mint(&user)?))
}
