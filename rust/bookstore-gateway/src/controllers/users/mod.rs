use actix_web::web;

mod change_login;
mod delete_user;
mod login;
mod refresh;
mod register;
pub mod users_dto;


pub fn setup_controllers(cfg: &mut web::ServiceConfig) {
    cfg.service(login::login);
    cfg.service(refresh::refresh);
    cfg.service(register::register);
    cfg.service(change_login::change_login);
    cfg.service(delete_user::delete_user);
}
