use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Error, Result, anyhow};
use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    producer::{FutureProducer, FutureRecord, Producer},
    util::Timeout,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{DispatchError, DispatchResult},
};

/// Broker acknowledgement for an accepted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub partition: i32,
    pub offset: i64,
}

/// Acknowledged, keyed send onto the notifications topic.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, key: &str, payload: &[u8]) -> DispatchResult<PublishReceipt>;

    async fn health_check(&self) -> Result<(), Error>;
}

pub struct KafkaPublisher {
    producer: Arc<FutureProducer>,
    topic: String,
    message_timeout: Duration,
}

impl KafkaPublisher {
    pub fn new(config: &Config) -> Result<Self, Error> {
        info!(brokers = %config.kafka_brokers, "Initializing Kafka producer");

        let producer: FutureProducer = client_config(config)
            .create()
            .context("Failed to create Kafka producer")?;

        info!(topic = %config.kafka_topic, "Kafka producer initialized");

        Ok(Self {
            producer: Arc::new(producer),
            topic: config.kafka_topic.clone(),
            message_timeout: config.message_timeout(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn flush(&self, timeout: Duration) -> Result<(), Error> {
        info!(timeout_ms = timeout.as_millis() as u64, "Flushing Kafka producer");

        self.producer
            .flush(Timeout::After(timeout))
            .context("Failed to flush Kafka producer")?;

        Ok(())
    }
}

fn client_config(config: &Config) -> ClientConfig {
    let mut client_config = ClientConfig::new();

    client_config
        .set("bootstrap.servers", &config.kafka_brokers)
        .set("acks", "all")
        .set(
            "message.timeout.ms",
            config.kafka_message_timeout_ms.to_string(),
        );

    client_config
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(&self, key: &str, payload: &[u8]) -> DispatchResult<PublishReceipt> {
        let record = FutureRecord::to(&self.topic).key(key).payload(payload);
        let start = Instant::now();

        // Queue timeout only; the delivery report is bounded by message.timeout.ms.
        match self
            .producer
            .send(record, Timeout::After(self.message_timeout))
            .await
        {
            Ok((partition, offset)) => {
                debug!(
                    topic = %self.topic,
                    key,
                    partition,
                    offset,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Message acknowledged by broker"
                );
                Ok(PublishReceipt { partition, offset })
            }
            Err((kafka_err, _)) => {
                debug!(
                    topic = %self.topic,
                    key,
                    error = %kafka_err,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Broker did not acknowledge message"
                );
                Err(DispatchError::publish(kafka_err))
            }
        }
    }

    async fn health_check(&self) -> Result<(), Error> {
        let producer = Arc::clone(&self.producer);
        let topic = self.topic.clone();
        let timeout = self.message_timeout;

        let metadata = tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(Some(topic.as_str()), Timeout::After(timeout))
        })
        .await
        .context("Metadata task panicked")?
        .context("Failed to fetch broker metadata")?;

        if metadata.brokers().is_empty() {
            return Err(anyhow!("No brokers reported in metadata"));
        }

        Ok(())
    }
}
