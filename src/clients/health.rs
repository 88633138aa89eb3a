use std::{collections::HashMap, sync::Arc, time::Instant};

use tracing::{debug, warn};

use crate::{
    clients::kafka::Publisher,
    models::health::{HealthReport, DependencyHealth},
};

pub struct HealthChecker {
    publisher: Arc<dyn Publisher>,
}

impl HealthChecker {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self { publisher }
    }

    pub async fn check_all(&self) -> HealthReport {
        let checks = HashMap::from([("message_broker".to_string(), self.check_broker().await)]);

        HealthReport::from_checks(checks)
    }

    async fn check_broker(&self) -> DependencyHealth {
        let start = Instant::now();

        let outcome = match self.publisher.health_check().await {
            Ok(()) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Broker health check passed");
                Ok(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "Broker health check failed");
                Err(format!("Metadata request failed: {}", e))
            }
        };

        DependencyHealth::from(outcome)
    }
}
