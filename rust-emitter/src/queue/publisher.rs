//! RabbitMQ publisher for formatted row messages.
//!
//! Each send declares the target queue and publishes to the default exchange
//! with the queue name as routing key. Publishes are fire-and-forget: no
//! publisher confirms are requested and nothing is retried.

use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::types::{ConnectionMode, PublisherOptions, Sink};
use crate::config::Config;
use crate::error::StreamError;
use crate::message::Message;

/// Publishes messages to one named queue.
///
/// In `PerMessage` mode every send opens its own connection and closes it
/// before returning, whatever the outcome. In `Held` mode the connection is
/// kept between sends, dropped after any failure, and released by `close`.
pub struct Publisher {
    url: String,
    queue: String,
    options: PublisherOptions,
    held: Mutex<Option<(Connection, Channel)>>,
}

impl Publisher {
    /// Create a publisher for the given AMQP URI and queue.
    pub fn new(url: String, queue: String, options: PublisherOptions) -> Self {
        Self {
            url,
            queue,
            options,
            held: Mutex::new(None),
        }
    }

    /// Build a publisher from the emitter configuration.
    pub fn from_config(config: &Config) -> Result<Self, StreamError> {
        let mode = if config.reuse_connection {
            ConnectionMode::Held
        } else {
            ConnectionMode::PerMessage
        };

        Ok(Self::new(
            config.amqp_url()?,
            config.queue_name.clone(),
            PublisherOptions {
                durable: config.queue_durable,
                mode,
            },
        ))
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn mode(&self) -> ConnectionMode {
        self.options.mode
    }

    /// Whether a held connection is currently open.
    pub async fn is_holding_connection(&self) -> bool {
        self.held.lock().await.is_some()
    }

    async fn connect(&self) -> Result<Connection, StreamError> {
        debug!(queue = %self.queue, "rabbitmq_connecting");

        Connection::connect(&self.url, ConnectionProperties::default())
            .await
            .map_err(|e| {
                error!(error = %e, "rabbitmq_connection_failed");
                StreamError::Connection(e)
            })
    }

    async fn declare_and_publish(
        &self,
        channel: &Channel,
        message: &Message,
    ) -> Result<(), StreamError> {
        channel
            .queue_declare(
                &self.queue,
                QueueDeclareOptions {
                    durable: self.options.durable,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|source| StreamError::Declaration {
                queue: self.queue.clone(),
                source,
            })?;

        debug!(
            queue = %self.queue,
            durable = self.options.durable,
            "rabbitmq_queue_declared"
        );

        // The returned confirm is dropped: confirms are not enabled.
        channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                message.as_bytes(),
                BasicProperties::default(),
            )
            .await
            .map_err(|source| StreamError::Publish {
                queue: self.queue.clone(),
                source,
            })?;

        info!(
            queue = %self.queue,
            message = %message,
            body_length = message.len(),
            "message_sent"
        );

        Ok(())
    }

    async fn send_per_message(&self, message: &Message) -> Result<(), StreamError> {
        let conn = self.connect().await?;

        let result = match conn.create_channel().await {
            Ok(channel) => self.declare_and_publish(&channel, message).await,
            Err(e) => Err(StreamError::Channel(e)),
        };

        close_connection(&conn).await;
        result
    }

    async fn send_held(&self, message: &Message) -> Result<(), StreamError> {
        let mut held = self.held.lock().await;

        let reusable = held
            .as_ref()
            .filter(|(conn, channel)| conn.status().connected() && channel.status().connected())
            .map(|(_, channel)| channel.clone());

        let channel = match reusable {
            Some(channel) => channel,
            None => {
                if let Some((stale, _)) = held.take() {
                    close_connection(&stale).await;
                }

                let conn = self.connect().await?;
                let channel = match conn.create_channel().await {
                    Ok(channel) => channel,
                    Err(e) => {
                        close_connection(&conn).await;
                        return Err(StreamError::Channel(e));
                    }
                };

                info!(queue = %self.queue, "rabbitmq_connection_held");
                *held = Some((conn, channel.clone()));
                channel
            }
        };

        let result = self.declare_and_publish(&channel, message).await;

        if result.is_err() {
            if let Some((conn, _)) = held.take() {
                close_connection(&conn).await;
            }
        }

        result
    }

    /// Release the held connection, if any.
    pub async fn close(&self) {
        if let Some((conn, _)) = self.held.lock().await.take() {
            close_connection(&conn).await;
        }
    }
}

impl Sink for Publisher {
    async fn send(&self, message: &Message) -> Result<(), StreamError> {
        match self.options.mode {
            ConnectionMode::PerMessage => self.send_per_message(message).await,
            ConnectionMode::Held => self.send_held(message).await,
        }
    }
}

/// Close a connection, logging rather than failing on error.
async fn close_connection(conn: &Connection) {
    match conn.close(200, "OK").await {
        Ok(()) => debug!("rabbitmq_connection_closed"),
        Err(e) => warn!(error = %e, "rabbitmq_connection_close_error"),
    }
}
