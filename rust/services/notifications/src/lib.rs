//! Notification service: turns broker events into per-user inboxes.

pub mod config;
pub mod directory;
pub mod inbox;
pub mod receivers;
pub mod service;

#[cfg(test)]
mod tests;

pub use service::NotificationService;
