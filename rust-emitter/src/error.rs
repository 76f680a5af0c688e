//! Error type shared by the reader, publisher and streaming driver.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a stream run.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The input file could not be opened.
    #[error("cannot open input file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input held no header record.
    #[error("input {source_name} is empty, expected a header line")]
    EndOfInput { source_name: String },

    /// A data record did not carry exactly six fields.
    #[error("malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid broker address: {0}")]
    Config(String),

    /// The broker could not be reached or refused the connection.
    #[error("connection to RabbitMQ server failed: {0}")]
    Connection(#[source] lapin::Error),

    #[error("failed to open channel: {0}")]
    Channel(#[source] lapin::Error),

    /// Queue declaration was rejected, usually because the queue already
    /// exists with different properties.
    #[error("failed to declare queue {queue}: {source}")]
    Declaration {
        queue: String,
        #[source]
        source: lapin::Error,
    },

    #[error("failed to publish to queue {queue}: {source}")]
    Publish {
        queue: String,
        #[source]
        source: lapin::Error,
    },
}

impl StreamError {
    /// True when the broker itself was unreachable.
    pub fn is_connection(&self) -> bool {
        matches!(self, StreamError::Connection(_))
    }
}
