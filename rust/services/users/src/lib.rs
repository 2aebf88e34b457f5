//! User service: accounts, credentials and the identity events other
//! services react to.

pub mod config;
pub mod dto;
pub mod handlers;
pub mod lifecycle;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use service::UserService;
pub use store::UserStore;
