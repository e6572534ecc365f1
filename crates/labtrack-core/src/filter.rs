//! List predicates. An absent field adds no predicate.
//!
//! Each filter also evaluates itself against an entity so the in-memory
//! repositories apply exactly the rules the SQL repositories express.

use chrono::NaiveDate;

use crate::domain::{Device, Experiment, Reactor, ReactorStatus, Role, User};
use crate::pagination::PageRequest;

/// Lower-cased `LIKE` pattern for a case-insensitive substring search.
pub fn search_pattern(term: &str) -> String {
    format!("%{}%", term.to_lowercase())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn normalize(term: Option<String>) -> Option<String> {
    term.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub page: PageRequest,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
}

impl UserFilter {
    pub fn new(page: PageRequest, search: Option<String>) -> Self {
        Self {
            page,
            search: normalize(search),
            ..Default::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        if let Some(term) = &self.search {
            if !contains_ci(&user.name, term) && !contains_ci(&user.email, term) {
                return false;
            }
        }
        self.is_active.is_none_or(|a| user.is_active == a) && self.role.is_none_or(|r| user.role == r)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReactorFilter {
    pub page: PageRequest,
    pub search: Option<String>,
    pub status: Option<ReactorStatus>,
    pub pathway: Option<String>,
}

impl ReactorFilter {
    pub fn new(page: PageRequest, search: Option<String>) -> Self {
        Self {
            page,
            search: normalize(search),
            ..Default::default()
        }
    }

    pub fn matches(&self, reactor: &Reactor) -> bool {
        if reactor.is_deleted() {
            return false;
        }
        if let Some(term) = &self.search {
            if !contains_ci(&reactor.name, term) {
                return false;
            }
        }
        self.status.is_none_or(|s| reactor.status == s)
            && self
                .pathway
                .as_deref()
                .is_none_or(|p| reactor.pathway.as_deref() == Some(p))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExperimentFilter {
    pub page: PageRequest,
    pub search: Option<String>,
    pub reactor_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

impl ExperimentFilter {
    pub fn new(page: PageRequest, search: Option<String>) -> Self {
        Self {
            page,
            search: normalize(search),
            ..Default::default()
        }
    }

    pub fn matches(&self, experiment: &Experiment) -> bool {
        if experiment.is_deleted() {
            return false;
        }
        if let Some(term) = &self.search {
            let hit = contains_ci(&experiment.batch_id, term)
                || contains_ci(&experiment.operator, term)
                || contains_ci(&experiment.block_id, term);
            if !hit {
                return false;
            }
        }
        self.reactor_id.is_none_or(|id| experiment.reactor_id == id)
            && self.date.is_none_or(|d| experiment.date == d)
    }
}

/// Unpaginated device listing, optionally scoped to one reactor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceFilter {
    pub reactor_id: Option<i64>,
}

impl DeviceFilter {
    pub fn matches(&self, device: &Device) -> bool {
        self.reactor_id.is_none_or(|id| device.reactor_id == id)
    }
}

/// Paginated readings of one device, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceReadingsFilter {
    pub device_id: i64,
    pub page: PageRequest,
}
