//! Streaming driver.
//!
//! Reads rows in order and, for each one, waits the configured interval,
//! formats it and sends it. The first error of any kind ends the stream and
//! is returned to the caller.

use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use crate::config::Config;
use crate::error::StreamError;
use crate::message::Message;
use crate::queue::{Publisher, Sink};
use crate::row::{Row, RowReader};

/// Outcome of a completed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamSummary {
    /// Messages handed to the sink without error
    pub published: u64,
}

/// Send every row through `sink`, sleeping `interval` before each send.
pub async fn stream_rows<I, S>(
    rows: I,
    sink: &S,
    interval: Duration,
) -> Result<StreamSummary, StreamError>
where
    I: IntoIterator<Item = Result<Row, StreamError>>,
    S: Sink,
{
    let mut summary = StreamSummary::default();

    for row in rows {
        sleep(interval).await;
        let row = row?;

        let message = Message::from_row(&row);
        sink.send(&message).await?;
        summary.published += 1;
    }

    Ok(summary)
}

/// Stream the configured input file to the configured queue.
///
/// A held publisher connection is released before returning, on success and
/// on failure.
pub async fn run(config: &Config) -> Result<StreamSummary, StreamError> {
    info!(
        input_path = %config.input_path.display(),
        broker_host = %config.broker_host,
        queue = %config.queue_name,
        interval_ms = config.interval_ms,
        "stream_starting"
    );

    let publisher = Publisher::from_config(config)?;
    let reader = RowReader::open(&config.input_path)?;

    let columns: Vec<&str> = reader.header().iter().collect();
    info!(header = ?columns, "header_skipped");

    let result = stream_rows(reader, &publisher, config.interval()).await;
    publisher.close().await;

    if let Ok(summary) = &result {
        info!(published = summary.published, "stream_complete");
    }

    result
}
