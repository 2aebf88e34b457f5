use crate::{
    dto::{ChangeLoginRequest, LoginRequest, RegisterRequest, UserQuery},
    service::UserService,
};
use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use api_utils::{parse_json_body, ApiError, Validate, CALLER_HEADER};
use bson::oid::ObjectId;

pub fn setup_controllers(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
    cfg.service(register);
    cfg.service(get_user);
    cfg.service(change_login);
    cfg.service(delete_user);
}

/// Id of the authenticated caller, relayed by the gateway.
pub fn caller_id(req: &HttpRequest) -> Result<ObjectId, ApiError> {
    let value = req
        .headers()
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::unauthorized("caller identity is required"))?;
    ObjectId::parse_str(value).map_err(|_| ApiError::unauthorized("caller identity is invalid"))
}

#[post("/users/login")]
pub async fn login(
    body: web::Bytes,
    service: web::Data<UserService>,
) -> Result<HttpResponse, ApiError> {
    let request: LoginRequest = parse_json_body(&body)?;
    let user = service.login(&request).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("/users/register")]
pub async fn register(
    body: web::Bytes,
    service: web::Data<UserService>,
) -> Result<HttpResponse, ApiError> {
    let request: RegisterRequest = parse_json_body(&body)?;
    let user = service.register(&request).await?;
    Ok(HttpResponse::Created().json(user))
}

#[get("/users")]
pub async fn get_user(
    query: web::Query<UserQuery>,
    service: web::Data<UserService>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;
    let user = service.get(&query.id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[patch("/users/login")]
pub async fn change_login(
    req: HttpRequest,
    body: web::Bytes,
    service: web::Data<UserService>,
) -> Result<HttpResponse, ApiError> {
    let caller = caller_id(&req)?;
    let request: ChangeLoginRequest = parse_json_body(&body)?;
    let user = service.change_login(caller, &request).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[delete("/users")]
pub async fn delete_user(
    req: HttpRequest,
    service: web::Data<UserService>,
) -> Result<HttpResponse, ApiError> {
    let caller = caller_id(&req)?;
    service.delete(caller).await?;
    Ok(HttpResponse::NoContent().finish())
}
