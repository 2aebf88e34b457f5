use crate::{
    middleware::auth::{claims_of, Authentication},
    providers::users_api::UsersApi,
};
use actix_web::{delete, web, HttpRequest, HttpResponse};
use api_utils::ApiError;

#[delete("/users", wrap = "Authentication::new()")]
pub async fn delete_user(
    req: HttpRequest,
    users: web::Data<dyn UsersApi>,
) -> Result<HttpResponse, ApiError> {
    let claims = claims_of(&req)?;
    users.delete(&claims.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
