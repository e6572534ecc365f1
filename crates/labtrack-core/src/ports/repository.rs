use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    Credentials, DashboardStats, Device, DeviceStats, DeviceUpdate, Experiment, ExperimentDraft,
    NewDevice, NewReactor, NewReading, NewUser, Reactor, ReactorUpdate, Reading, User, UserUpdate,
};
use crate::error::RepoError;
use crate::filter::{DeviceFilter, DeviceReadingsFilter, ExperimentFilter, ReactorFilter, UserFilter};
use crate::pagination::Page;

/// User accounts, their password hashes and the last issued refresh token.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser, password_hash: String) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Look up a user with the stored password hash, for login only.
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, RepoError>;

    async fn update(&self, id: i64, update: UserUpdate) -> Result<User, RepoError>;

    async fn update_password(&self, id: i64, password_hash: String) -> Result<(), RepoError>;

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;

    async fn refresh_token(&self, id: i64) -> Result<Option<String>, RepoError>;

    async fn set_refresh_token(&self, id: i64, token: Option<String>) -> Result<(), RepoError>;
}

/// Reactors. Deletion is soft; deleted rows behave as missing.
#[async_trait]
pub trait ReactorRepository: Send + Sync {
    async fn create(&self, reactor: NewReactor) -> Result<Reactor, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Reactor>, RepoError>;

    async fn update(&self, id: i64, update: ReactorUpdate) -> Result<Reactor, RepoError>;

    async fn list(&self, filter: &ReactorFilter) -> Result<Page<Reactor>, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Fails with `ForeignKey` when the reactor does not exist.
    async fn create(&self, device: NewDevice) -> Result<Device, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Device>, RepoError>;

    async fn update(&self, id: i64, update: DeviceUpdate) -> Result<Device, RepoError>;

    async fn list(&self, filter: &DeviceFilter) -> Result<Vec<Device>, RepoError>;

    /// Removes the device and its readings.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;

    async fn stats(&self) -> Result<DeviceStats, RepoError>;
}

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Fails with `ForeignKey` when the device does not exist.
    async fn create(&self, reading: NewReading) -> Result<Reading, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Reading>, RepoError>;

    async fn list_by_device(&self, filter: &DeviceReadingsFilter) -> Result<Page<Reading>, RepoError>;

    /// All readings of the device on one UTC day, oldest first.
    async fn list_by_date(&self, device_id: i64, date: NaiveDate) -> Result<Vec<Reading>, RepoError>;

    /// All readings of the device with `start <= timestamp <= end`, oldest first.
    async fn list_by_range(
        &self,
        device_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, RepoError>;
}

/// Experiments. Deletion is soft; deleted rows behave as missing.
#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    /// Fails with `ForeignKey` when the reactor does not exist.
    async fn create(&self, draft: ExperimentDraft) -> Result<Experiment, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Experiment>, RepoError>;

    async fn update(&self, id: i64, draft: ExperimentDraft) -> Result<Experiment, RepoError>;

    async fn list(&self, filter: &ExperimentFilter) -> Result<Page<Experiment>, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Counters as of `today`. User totals are left empty unless `include_users`.
    async fn dashboard_stats(
        &self,
        include_users: bool,
        today: NaiveDate,
    ) -> Result<DashboardStats, RepoError>;
}
