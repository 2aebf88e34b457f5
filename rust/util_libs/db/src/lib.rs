pub mod config;
pub mod error;
pub mod mongodb;
pub mod schemas;


pub use config::DbConfig;
pub use error::DbError;
