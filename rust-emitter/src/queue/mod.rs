//! Queue module for RabbitMQ operations.
//!
//! This module provides:
//! - The `Sink` seam the streaming driver publishes through
//! - A publisher that declares the target queue and publishes to it
//!
//! ## Flow
//!
//! ```text
//! Message → Sink::send → Publisher → default exchange → queue (routing key = queue name)
//! ```

pub mod publisher;
pub mod types;

pub use publisher::Publisher;
pub use types::{ConnectionMode, PublisherOptions, Sink};
