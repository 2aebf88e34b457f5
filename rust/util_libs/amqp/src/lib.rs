//! Broker plumbing shared by the bookstore services.
//!
//! Every event type owns a fixed [`types::Topology`]: a fanout exchange, a
//! queue bound to it with the `#` key, and the content type of its body.
//! Senders open a channel per publish; receivers keep one channel per queue
//! for the life of the consumer.

pub mod config;
pub mod connection;
pub mod error;
pub mod receiver;
pub mod sender;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::BrokerConfig;
pub use error::AmqpError;
pub use receiver::{EventHandler, Receiver};
pub use sender::{AmqpPublisher, EventSender, Publisher};
pub use types::{
    Event, NotificationMessage, NotificationType, Topology, UserDeleted, UserLoginChanged,
};
