use crate::{
    middleware::auth::{claims_of, Authentication},
    providers::{tokens::TokenService, users_api::UsersApi},
};
use actix_web::{patch, web, HttpRequest, HttpResponse};
use api_utils::{parse_json_body, ApiError, Validate};
use users::dto::ChangeLoginRequest;

/// Renames the caller. The old access token still names the old login, so a
/// fresh pair is returned.
#[patch("/users/login", wrap = "Authentication::new()")]
pub async fn change_login(
    req: HttpRequest,
    body: web::Bytes,
    users: web::Data<dyn UsersApi>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, ApiError> {
    let claims = claims_of(&req)?;
    let request: ChangeLoginRequest = parse_json_body(&body)?;
    request.validate()?;

    let user = users.change_login(&claims.id, &request).await?;
    Ok(HttpResponse::Ok().json(tokens.mint(&user)?))
}
