//! Publisher options and the sink trait.

use crate::error::StreamError;
use crate::message::Message;

/// How the publisher manages its broker connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// Open, publish and close a fresh connection for every message.
    #[default]
    PerMessage,
    /// Open one connection on first use and keep it until `close`.
    Held,
}

/// Queue and connection settings for a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublisherOptions {
    /// Declare the queue as durable
    pub durable: bool,
    pub mode: ConnectionMode,
}

/// Destination for formatted messages.
#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Deliver one message. An error ends the stream.
    async fn send(&self, message: &Message) -> Result<(), StreamError>;
}
