use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Sensor values captured in one sample. At least one must be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingPayload {
    pub co2: Option<f64>,
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
}

impl ReadingPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.co2.is_none() && self.humidity.is_none() && self.temperature.is_none() {
            return Err(DomainError::validation(
                "at least one sensor reading must be provided",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: i64,
    pub device_id: i64,
    pub payload: ReadingPayload,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReading {
    pub device_id: i64,
    pub payload: ReadingPayload,
}
