use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use notification_producer::{
    api::{AppState, run_api_server},
    clients::kafka::KafkaPublisher,
    config::Config,
    models::user::Directory,
    shutdown::shutdown_signal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load()?;

    let publisher = Arc::new(KafkaPublisher::new(&config)?);
    let directory = Directory::default_users();

    info!(
        users = directory.len(),
        topic = %publisher.topic(),
        "Configuration validated"
    );

    let state = Arc::new(AppState::new(directory, publisher.clone()));

    run_api_server(&config, state, shutdown_signal())
        .await
        .map_err(|e| anyhow!("Server error: {}", e))?;

    if let Err(e) = publisher.flush(config.shutdown_flush_timeout()) {
        warn!(error = %e, "Pending notifications may not have been delivered");
    }

    info!("Notification producer stopped");

    Ok(())
}
