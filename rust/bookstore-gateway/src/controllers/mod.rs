use actix_web::web;

pub mod books;
pub mod genres;
pub mod users;

/// Every route served under `/api/v1`.
pub fn setup_controllers(cfg: &mut web::ServiceConfig) {
    users::setup_controllers(cfg);
    books::setup_controllers(cfg);
    genres::setup_controllers(cfg);
}
