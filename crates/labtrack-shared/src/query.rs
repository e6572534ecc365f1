//! Query-string parameters for list endpoints.
//!
//! Each struct turns raw strings into a typed filter. Malformed values fail
//! as `invalid` before any storage access.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use labtrack_core::error::DomainError;
use labtrack_core::filter::{
    DeviceFilter, DeviceReadingsFilter, ExperimentFilter, ReactorFilter, UserFilter,
};
use labtrack_core::pagination::PageRequest;
use labtrack_core::time::{parse_date, parse_range};

fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_date)
        .transpose()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    #[serde(rename = "isActive", alias = "is_active")]
    pub is_active: Option<bool>,
    pub role: Option<String>,
}

impl UserListQuery {
    pub fn into_filter(self) -> Result<UserFilter, DomainError> {
        let mut filter = UserFilter::new(PageRequest::from_query(self.page, self.limit)?, self.search);
        filter.is_active = self.is_active;
        filter.role = self.role.as_deref().map(str::parse).transpose()?;
        Ok(filter)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactorListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub pathway: Option<String>,
}

impl ReactorListQuery {
    pub fn into_filter(self) -> Result<ReactorFilter, DomainError> {
        let mut filter =
            ReactorFilter::new(PageRequest::from_query(self.page, self.limit)?, self.search);
        filter.status = self.status.as_deref().map(str::parse).transpose()?;
        filter.pathway = self.pathway.filter(|p| !p.trim().is_empty());
        Ok(filter)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperimentListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    #[serde(rename = "reactorId", alias = "reactor_id")]
    pub reactor_id: Option<i64>,
    pub date: Option<String>,
}

impl ExperimentListQuery {
    pub fn into_filter(self) -> Result<ExperimentFilter, DomainError> {
        let mut filter =
            ExperimentFilter::new(PageRequest::from_query(self.page, self.limit)?, self.search);
        filter.reactor_id = self.reactor_id;
        filter.date = optional_date(self.date.as_deref())?;
        Ok(filter)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceListQuery {
    #[serde(rename = "reactorId", alias = "reactor_id")]
    pub reactor_id: Option<i64>,
}

impl From<DeviceListQuery> for DeviceFilter {
    fn from(query: DeviceListQuery) -> Self {
        Self {
            reactor_id: query.reactor_id,
        }
    }
}

/// One of the three reading listings, selected by `list_by`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingListing {
    Device(DeviceReadingsFilter),
    Timeslot {
        device_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Date {
        device_id: i64,
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingListQuery {
    pub list_by: Option<String>,
    pub device_id: Option<i64>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ReadingListQuery {
    /// Resolve the listing mode. Anything other than `device` or `timeslot`
    /// lists by date.
    pub fn into_listing(self) -> Result<ReadingListing, DomainError> {
        match self.list_by.as_deref().unwrap_or("date") {
            "device" => {
                let device_id = self.device_id.ok_or_else(|| {
                    DomainError::validation("device_id query parameter is required for device-based listing")
                })?;
                Ok(ReadingListing::Device(DeviceReadingsFilter {
                    device_id,
                    page: PageRequest::from_query(self.page, self.limit)?,
                }))
            }
            "timeslot" => {
                let (Some(start), Some(end)) = (
                    self.start.filter(|s| !s.is_empty()),
                    self.end.filter(|e| !e.is_empty()),
                ) else {
                    return Err(DomainError::validation(
                        "start and end query parameters are required for timeslot-based listing",
                    ));
                };
                let (start, end) = parse_range(&start, &end)?;
                let device_id = self.device_id.ok_or_else(|| {
                    DomainError::validation("device_id query parameter is required for timeslot-based listing")
                })?;
                Ok(ReadingListing::Timeslot {
                    device_id,
                    start,
                    end,
                })
            }
            _ => {
                let device_id = self.device_id.ok_or_else(|| {
                    DomainError::validation("device_id query parameter is required for date-based listing")
                })?;
                let date = optional_date(self.date.as_deref())?.ok_or_else(|| {
                    DomainError::validation("date query parameter is required for date-based listing")
                })?;
                Ok(ReadingListing::Date { device_id, date })
            }
        }
    }
}
