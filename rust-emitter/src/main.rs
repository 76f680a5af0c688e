//! csvstream emitter - streams CSV rows onto a RabbitMQ queue.
//!
//! Exit status is 0 when every row was sent, 1 when the broker could not be
//! reached, and 2 for any other failure.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use csvstream::{Config, StreamError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("emitter_starting");

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        input_path = %config.input_path.display(),
        broker_host = %config.broker_host,
        broker_port = config.broker_port,
        queue = %config.queue_name,
        interval_ms = config.interval_ms,
        reuse_connection = config.reuse_connection,
        "config_loaded"
    );

    let result = csvstream::run(&config)
        .await
        .with_context(|| format!("streaming {} failed", config.input_path.display()));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let chain = format!("{e:#}");
            error!(error = %chain, "stream_failed");

            let connection_failed = e
                .downcast_ref::<StreamError>()
                .is_some_and(StreamError::is_connection);

            if connection_failed {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}
