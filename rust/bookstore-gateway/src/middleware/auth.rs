use crate::providers::{jwt::AccessTokenClaims, tokens::TokenService};
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpRequest,
};
use api_utils::ApiError;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};

/// Bearer-token guard for a route or scope.
///
/// Without roles any valid token passes. With roles the token must carry at
/// least one of them. On success the verified claims are stored in the
/// request extensions; read them back with [`claims_of`].
#[derive(Clone, Default)]
pub struct Authentication {
    roles: Rc<Vec<String>>,
}

impl Authentication {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles(roles: &[&str]) -> Self {
        Self {
            roles: Rc::new(roles.iter().map(|role| role.to_string()).collect()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthenticationMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddleware {
            service,
            roles: self.roles.clone(),
        }))
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
    roles: Rc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req, &self.roles) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let response = self.service.call(req);
                Box::pin(async move { response.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                tracing::debug!("rejected {} {}: {}", req.method(), req.path(), err);
                let response = req.error_response(err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

fn authenticate(req: &ServiceRequest, roles: &[String]) -> Result<AccessTokenClaims, ApiError> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| ApiError::internal("token service is not registered"))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("authorization header is required"))?;
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty() && !token.contains(' '))
        .ok_or_else(|| ApiError::unauthorized("authorization header is malformed"))?;

    let claims = tokens.verify(token)?;
    if !roles.is_empty() && !claims.has_any_role(roles) {
        return Err(ApiError::forbidden("insufficient permissions"));
    }
    Ok(claims)
}

/// Claims stored by [`Authentication`] for this request.
pub fn claims_of(req: &HttpRequest) -> Result<AccessTokenClaims, ApiError> {
    req.extensions()
        .get::<AccessTokenClaims>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("authentication is required"))
}
