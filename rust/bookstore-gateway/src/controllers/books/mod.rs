use crate::middleware::auth::Authentication;
use actix_web::web;
use db_utils::schemas::user::ROLE_ADMIN;

pub mod add_book;


/// Largest book upload accepted, cover and file included.
pub const BOOK_UPLOAD_LIMIT: usize = 32 * 1024 * 1024;

pub fn setup_controllers(cfg: &mut web::ServiceConfig) {
    // the raised limit covers uploads only; other routes keep actix's default
    cfg.service(
        web::resource("/books")
            .app_data(web::PayloadConfig::new(BOOK_UPLOAD_LIMIT))
            .wrap(Authentication::with_roles(&[ROLE_ADMIN]))
            .route(web::post().to(add_book::add_book)),
    );
}
