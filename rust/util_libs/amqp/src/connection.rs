use crate::{config::BrokerConfig, error::AmqpError};
use lapin::{Connection, ConnectionProperties};

/// Opens the single broker connection a service shares between its senders
/// and receivers.
pub async fn connect(config: &BrokerConfig) -> Result<Connection, AmqpError> {
    let uri = config.uri()?;
    log::info!(
        "connecting to broker at {}:{}",
        config.rabbitmq_host,
        config.rabbitmq_port
    );
    let connection = Connection::connect(&uri, ConnectionProperties::default())
        .await
        .map_err(|err| AmqpError::broker("connect", err))?;
    log::info!("broker connection established");
    Ok(connection)
}

/// Closes the connection; every channel opened on it closes with it.
pub async fn close(connection: &Connection) -> Result<(), AmqpError> {
    if !connection.status().connected() {
        return Ok(());
    }
    connection
        .close(200, "service shutdown")
        .await
        .map_err(|err| AmqpError::broker("close connection", err))
}
