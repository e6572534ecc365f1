use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactorStatus {
    Active,
    Inactive,
    Maintenance,
}

impl ReactorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactorStatus::Active => "active",
            ReactorStatus::Inactive => "inactive",
            ReactorStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ReactorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactorStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ReactorStatus::Active),
            "inactive" => Ok(ReactorStatus::Inactive),
            "maintenance" => Ok(ReactorStatus::Maintenance),
            other => Err(DomainError::validation(format!(
                "invalid reactor status '{other}', expected active, inactive or maintenance"
            ))),
        }
    }
}

/// Reactor entity. Rows with `deleted_at` set are treated as gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reactor {
    pub id: i64,
    pub name: String,
    pub status: ReactorStatus,
    pub pathway: Option<String>,
    pub pdf_url: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Reactor {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewReactor {
    pub name: String,
    pub status: ReactorStatus,
    pub pathway: Option<String>,
    pub pdf_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReactorUpdate {
    pub name: Option<String>,
    pub status: Option<ReactorStatus>,
    pub pathway: Option<String>,
    pub pdf_url: Option<String>,
}

impl ReactorUpdate {
    pub fn apply(self, reactor: &mut Reactor) {
        if let Some(name) = self.name {
            reactor.name = name;
        }
        if let Some(status) = self.status {
            reactor.status = status;
        }
        if let Some(pathway) = self.pathway {
            reactor.pathway = Some(pathway);
        }
        if let Some(pdf_url) = self.pdf_url {
            reactor.pdf_url = Some(pdf_url);
        }
    }
}
