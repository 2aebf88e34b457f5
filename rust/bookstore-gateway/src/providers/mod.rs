pub mod config;
pub mod downstream;
pub mod jwt;
pub mod tokens;
pub mod users_api;
