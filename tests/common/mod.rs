use std::{
    io,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI64, Ordering},
    },
};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use notification_producer::{
    clients::kafka::{PublishReceipt, Publisher},
    error::{DispatchError, DispatchResult},
    models::notification::Notification,
};
use tracing::{Level, subscriber::DefaultGuard};

#[derive(Debug, Clone)]
pub struct PublishedRecord {
    pub key: String,
    pub payload: Vec<u8>,
}

impl PublishedRecord {
    pub fn notification(&self) -> Notification {
        serde_json::from_slice(&self.payload).expect("payload should decode")
    }
}

/// In-memory stand-in for the broker that records every publish call.
#[derive(Default)]
pub struct RecordingPublisher {
    records: Mutex<Vec<PublishedRecord>>,
    attempts: AtomicI64,
    fail_with: Mutex<Option<String>>,
    unhealthy: AtomicBool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(cause: &str) -> Self {
        let publisher = Self::default();
        *publisher.fail_with.lock().unwrap() = Some(cause.to_string());
        publisher
    }

    pub fn set_unhealthy(&self) {
        self.unhealthy.store(true, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> i64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<PublishedRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, key: &str, payload: &[u8]) -> DispatchResult<PublishReceipt> {
        let offset = self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(cause) = self.fail_with.lock().unwrap().clone() {
            return Err(DispatchError::publish(cause));
        }

        self.records.lock().unwrap().push(PublishedRecord {
            key: key.to_string(),
            payload: payload.to_vec(),
        });

        Ok(PublishReceipt {
            partition: 0,
            offset,
        })
    }

    async fn health_check(&self) -> Result<(), Error> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(anyhow!("Local: All broker connections are down"));
        }
        Ok(())
    }
}

/// Log lines written while a `capture_logs` guard is alive on this thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn capture_logs(level: Level) -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    (logs, tracing::subscriber::set_default(subscriber))
}
