use crate::providers::{
    downstream::Downstream,
    jwt::AccessTokenClaims,
    tokens::TokenService,
    users_api::UsersApi,
};
use actix_web::{
    dev::HttpServiceFactory,
    http::{header::HeaderMap, StatusCode},
    test::{self, TestRequest},
    web, App, HttpMessage,
};
use api_utils::{error::query_config, ApiError};
use async_trait::async_trait;
use cache_utils::ByteCache;
use std::sync::{Arc, Mutex};
use users::dto::{ChangeLoginRequest, LoginRequest, RegisterRequest, UserSnapshot};

pub const TEST_JWT_SECRET: &str = "jwt_secret";
pub const ADMIN_ID: &str = "57bf425a34ce5ee85891b914";

#[derive(Default)]
pub struct WebData {
    pub tokens: Option<web::Data<TokenService>>,
    pub users: Option<Arc<dyn UsersApi>>,
    pub downstream: Option<Downstream>,
    pub auth: Option<AccessTokenClaims>,
}

pub struct IntegrationTestResponse {
    pub status: StatusCode,
    pub body: Option<serde_json::Value>,
    pub text: String,
    pub headers: HeaderMap,
}

pub async fn perform_integration_test<C: HttpServiceFactory + 'static>(
    controller: C,
    req: TestRequest,
    web_data: WebData,
) -> Result<IntegrationTestResponse, anyhow::Error> {
    let req = req.to_request();

    let mut app_builder = web::scope("").app_data(query_config());

    if let Some(tokens) = web_data.tokens {
        app_builder = app_builder.app_data(tokens);
    }

    if let Some(users) = web_data.users {
        app_builder = app_builder.app_data(web::Data::from(users));
    }

    if let Some(downstream) = web_data.downstream {
        app_builder = app_builder.app_data(web::Data::new(downstream));
    }

    if let Some(auth) = web_data.auth {
        req.extensions_mut().insert(auth);
    }

    let app = test::init_service(App::new().service(app_builder.service(controller))).await;
    let res = test::call_service(&app, req).await;

    let status = res.status();
    let headers = res.headers().clone();
    let bytes = test::read_body(res).await;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let body = serde_json::from_slice(&bytes).ok();

    Ok(IntegrationTestResponse {
        status,
        body,
        text,
        headers,
    })
}

pub fn test_token_service() -> web::Data<TokenService> {
    web::Data::new(TokenService::new(
        TEST_JWT_SECRET,
        Arc::new(ByteCache::new(1024 * 1024)),
    ))
}

/// User service double holding a single `admin`/`admin` account.
pub struct FakeUsersApi {
    pub users: Mutex<Vec<(UserSnapshot, String)>>,
    pub deleted: Mutex<Vec<String>>,
}

impl Default for FakeUsersApi {
    fn default() -> Self {
        let admin = UserSnapshot {
            id: ADMIN_ID.to_string(),
            login: "admin".to_string(),
            email: String::new(),
            roles: vec!["user".to_string(), "admin".to_string()],
        };
        Self {
            users: Mutex::new(vec![(admin, "admin".to_string())]),
            deleted: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl UsersApi for FakeUsersApi {
    async fn login(&self, request: &LoginRequest) -> Result<UserSnapshot, ApiError> {
        let users = self.users.lock().unwrap();
        users
            .iter()
            .find(|(user, password)| user.login == request.login && *password == request.password)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| ApiError::not_found("user not found"))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserSnapshot, ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|(user, _)| user.login == request.login) {
            return Err(ApiError::conflict("login is already taken"));
        }
        let user = UserSnapshot {
            id: bson::oid::ObjectId::new().to_hex(),
            login: request.login.clone(),
            email: String::new(),
            roles: vec!["user".to_string()],
        };
        users.push((user.clone(), request.password.clone()));
        Ok(user)
    }

    async fn change_login(
        &self,
        caller: &str,
        request: &ChangeLoginRequest,
    ) -> Result<UserSnapshot, ApiError> {
        let mut users = self.users.lock().unwrap();
        let (user, _) = users
            .iter_mut()
            .find(|(user, _)| user.id == caller)
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        user.login = request.login.clone();
        Ok(user.clone())
    }

    async fn delete(&self, caller: &str) -> Result<(), ApiError> {
        self.deleted.lock().unwrap().push(caller.to_string());
        Ok(())
    }
}

/// Starts a throwaway HTTP server on a random local port standing in for a
/// downstream service, returning its base url.
pub fn start_downstream(configure: fn(&mut web::ServiceConfig)) -> String {
    let server = actix_web::HttpServer::new(move || App::new().configure(configure))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

/// Downstream clients that all point at `base_url`.
pub fn downstream_at(base_url: &str) -> Downstream {
    Downstream {
        books: api_utils::ServiceClient::new(base_url).unwrap(),
        genres: api_utils::ServiceClient::new(base_url).unwrap(),
    }
}

/// A signed access token for `user`, minted through `tokens`.
pub fn bearer(tokens: &TokenService, user: &UserSnapshot) -> String {
    format!("Bearer {}", tokens.mint(user).unwrap().token)
}

pub fn snapshot(roles: &[&str]) -> UserSnapshot {
    UserSnapshot {
        id: ADMIN_ID.to_string(),
        login: "someone".to_string(),
        email: String::new(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
    }
}
