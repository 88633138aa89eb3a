use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of checking one dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyHealth {
    pub status: HealthStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<u64, String>> for DependencyHealth {
    fn from(outcome: Result<u64, String>) -> Self {
        match outcome {
            Ok(elapsed) => Self {
                status: HealthStatus::Healthy,
                response_time_ms: Some(elapsed),
                error: None,
            },
            Err(error) => Self {
                status: HealthStatus::Unhealthy,
                response_time_ms: None,
                error: Some(error),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub checks: HashMap<String, DependencyHealth>,
}

impl HealthReport {
    /// Healthy only when every dependency is.
    pub fn from_checks(checks: HashMap<String, DependencyHealth>) -> Self {
        let status = if checks
            .values()
            .all(|check| check.status == HealthStatus::Healthy)
        {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        Self {
            status,
            timestamp: Utc::now(),
            checks,
        }
    }
}
