use actix_web::web;

pub mod create_genre;
pub mod genres_dto;
pub mod get_genres;


pub fn setup_controllers(cfg: &mut web::ServiceConfig) {
    cfg.service(get_genres::get_all_genres);
    cfg.service(get_genres::get_genres);
    cfg.service(create_genre::create_genre);
}
