//! csvstream - CSV row emitter for RabbitMQ.
//!
//! Reads a CSV file row by row and publishes each row as a bracketed text
//! message onto one named queue, pausing between sends to mimic a live feed.
//!
//! ## Architecture
//!
//! ```text
//! CSV file → RowReader → Message → Publisher → RabbitMQ queue
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod queue;
pub mod row;
pub mod stream;

// Re-export commonly used types
pub use config::Config;
pub use error::StreamError;
pub use message::Message;
pub use queue::{ConnectionMode, Publisher, PublisherOptions, Sink};
pub use row::{Row, RowReader};
pub use stream::{run, stream_rows, StreamSummary};
