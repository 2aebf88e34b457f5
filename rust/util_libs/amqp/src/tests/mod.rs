mod config;
mod types;

use crate::{error::AmqpError, sender::Publisher, types::Topology};
use async_trait::async_trait;
use std::sync::Mutex;

/// Publisher that keeps every published message in memory.
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(Topology, Vec<u8>)>>,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, topology: &Topology, body: Vec<u8>) -> Result<(), AmqpError> {
        self.published.lock().unwrap().push((*topology, body));
        Ok(())
    }
}
