//! In-memory storage implementing every repository port.
//!
//! Used when no `DATABASE_URL` is configured and as the test double.
//! Uniqueness, foreign keys and soft deletes follow the SQL schema.
//! Data is lost on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use labtrack_core::domain::{
    Credentials, DashboardStats, Device, DeviceStats, DeviceUpdate, Experiment, ExperimentDraft,
    NewDevice, NewReactor, NewReading, NewUser, Reactor, ReactorStatus, ReactorUpdate, Reading,
    User, UserUpdate,
};
use labtrack_core::error::RepoError;
use labtrack_core::filter::{
    DeviceFilter, DeviceReadingsFilter, ExperimentFilter, ReactorFilter, UserFilter,
};
use labtrack_core::pagination::{Page, PageRequest};
use labtrack_core::ports::{
    DashboardRepository, DeviceRepository, ExperimentRepository, ReactorRepository,
    ReadingRepository, UserRepository,
};
use labtrack_core::time::{day_bounds, week_bounds};

use super::not_found;

struct UserRow {
    user: User,
    password_hash: String,
    refresh_token: Option<String>,
}

#[derive(Default)]
struct Sequences {
    users: i64,
    reactors: i64,
    devices: i64,
    readings: i64,
    experiments: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Default)]
struct Tables {
    seq: Sequences,
    users: BTreeMap<i64, UserRow>,
    reactors: BTreeMap<i64, Reactor>,
    devices: BTreeMap<i64, Device>,
    readings: BTreeMap<i64, Reading>,
    experiments: BTreeMap<i64, Experiment>,
}

impl Tables {
    fn check_user_unique(
        &self,
        id: Option<i64>,
        email: &str,
        phone: Option<&str>,
    ) -> Result<(), RepoError> {
        let clash = self.users.values().any(|row| {
            Some(row.user.id) != id
                && (row.user.email == email
                    || (phone.is_some() && row.user.phone_number.as_deref() == phone))
        });

        if clash {
            return Err(RepoError::Constraint("record already exists".to_string()));
        }
        Ok(())
    }

    fn live_reactor(&self, id: i64) -> Option<&Reactor> {
        self.reactors.get(&id).filter(|r| !r.is_deleted())
    }

    fn ensure_reactor(&self, id: i64) -> Result<(), RepoError> {
        match self.live_reactor(id) {
            Some(_) => Ok(()),
            None => Err(RepoError::ForeignKey(format!(
                "reactor with id {id} does not exist"
            ))),
        }
    }
}

/// Slice one page out of an already filtered and ordered result set.
fn window<T>(rows: Vec<T>, page: PageRequest) -> Page<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.page_size() as usize)
        .collect();

    Page::new(items, page, total)
}

/// Newest first, ties broken by id.
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[derive(Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reading with an explicit timestamp. Imports and tests use this;
    /// the repository port always stamps the current time.
    pub async fn insert_reading_at(
        &self,
        reading: NewReading,
        timestamp: DateTime<Utc>,
    ) -> Result<Reading, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.devices.contains_key(&reading.device_id) {
            return Err(RepoError::ForeignKey(format!(
                "device with id {} does not exist",
                reading.device_id
            )));
        }

        let id = next(&mut tables.seq.readings);
        let reading = Reading {
            id,
            device_id: reading.device_id,
            payload: reading.payload,
            timestamp,
        };
        tables.readings.insert(id, reading.clone());
        Ok(reading)
    }

    async fn readings_between(
        &self,
        device_id: i64,
        keep: impl Fn(DateTime<Utc>) -> bool,
    ) -> Vec<Reading> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Reading> = tables
            .readings
            .values()
            .filter(|r| r.device_id == device_id && keep(r.timestamp))
            .cloned()
            .collect();

        rows.sort_by_key(|r| (r.timestamp, r.id));
        rows
    }
}

#[async_trait]
impl UserRepository for InMemoryDatabase {
    async fn create(&self, new_user: NewUser, password_hash: String) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(None, &new_user.email, new_user.phone_number.as_deref())?;

        let id = next(&mut tables.seq.users);
        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            phone_number: new_user.phone_number,
            role: new_user.role,
            is_active: new_user.is_active,
            created_at: Utc::now(),
        };

        tables.users.insert(
            id,
            UserRow {
                user: user.clone(),
                password_hash,
                refresh_token: None,
            },
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|row| row.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|row| row.user.email == email)
            .map(|row| row.user.clone()))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|row| row.user.email == email)
            .map(|row| Credentials {
                user: row.user.clone(),
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        let mut user = tables
            .users
            .get(&id)
            .map(|row| row.user.clone())
            .ok_or_else(|| not_found("user", id))?;
        update.apply(&mut user);
        tables.check_user_unique(Some(id), &user.email, user.phone_number.as_deref())?;

        if let Some(row) = tables.users.get_mut(&id) {
            row.user = user.clone();
        }
        Ok(user)
    }

    async fn update_password(&self, id: i64, password_hash: String) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let row = tables.users.get_mut(&id).ok_or_else(|| not_found("user", id))?;
        row.password_hash = password_hash;
        Ok(())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<User> = tables
            .users
            .values()
            .map(|row| &row.user)
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();

        newest_first(&mut rows, |u| (u.created_at, u.id));
        Ok(window(rows, filter.page))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("user", id))
    }

    async fn refresh_token(&self, id: i64) -> Result<Option<String>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&id)
            .map(|row| row.refresh_token.clone())
            .ok_or_else(|| not_found("user", id))
    }

    async fn set_refresh_token(&self, id: i64, token: Option<String>) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let row = tables.users.get_mut(&id).ok_or_else(|| not_found("user", id))?;
        row.refresh_token = token;
        Ok(())
    }
}

#[async_trait]
impl ReactorRepository for InMemoryDatabase {
    async fn create(&self, new_reactor: NewReactor) -> Result<Reactor, RepoError> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.seq.reactors);

        let reactor = Reactor {
            id,
            name: new_reactor.name,
            status: new_reactor.status,
            pathway: new_reactor.pathway,
            pdf_url: new_reactor.pdf_url,
            deleted_at: None,
            created_at: Utc::now(),
        };
        tables.reactors.insert(id, reactor.clone());
        Ok(reactor)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reactor>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.live_reactor(id).cloned())
    }

    async fn update(&self, id: i64, update: ReactorUpdate) -> Result<Reactor, RepoError> {
        let mut tables = self.tables.write().await;
        let reactor = tables
            .reactors
            .get_mut(&id)
            .filter(|r| !r.is_deleted())
            .ok_or_else(|| not_found("reactor", id))?;

        update.apply(reactor);
        Ok(reactor.clone())
    }

    async fn list(&self, filter: &ReactorFilter) -> Result<Page<Reactor>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Reactor> = tables
            .reactors
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(window(rows, filter.page))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let reactor = tables
            .reactors
            .get_mut(&id)
            .filter(|r| !r.is_deleted())
            .ok_or_else(|| not_found("reactor", id))?;

        reactor.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl DeviceRepository for InMemoryDatabase {
    async fn create(&self, new_device: NewDevice) -> Result<Device, RepoError> {
        let mut tables = self.tables.write().await;
        tables.ensure_reactor(new_device.reactor_id)?;

        let id = next(&mut tables.seq.devices);
        let device = Device {
            id,
            name: new_device.name,
            reactor_id: new_device.reactor_id,
            status: new_device.status,
            created_at: Utc::now(),
        };
        tables.devices.insert(id, device.clone());
        Ok(device)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Device>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.devices.get(&id).cloned())
    }

    async fn update(&self, id: i64, update: DeviceUpdate) -> Result<Device, RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(reactor_id) = update.reactor_id {
            tables.ensure_reactor(reactor_id)?;
        }

        let device = tables
            .devices
            .get_mut(&id)
            .ok_or_else(|| not_found("device", id))?;
        update.apply(device);
        Ok(device.clone())
    }

    async fn list(&self, filter: &DeviceFilter) -> Result<Vec<Device>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Device> = tables
            .devices
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();

        newest_first(&mut rows, |d| (d.created_at, d.id));
        Ok(rows)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .devices
            .remove(&id)
            .ok_or_else(|| not_found("device", id))?;
        tables.readings.retain(|_, r| r.device_id != id);
        Ok(())
    }

    async fn stats(&self) -> Result<DeviceStats, RepoError> {
        let tables = self.tables.read().await;
        let total_devices = tables.devices.len() as u64;
        let active_devices = tables.devices.values().filter(|d| d.status).count() as u64;

        Ok(DeviceStats {
            total_devices,
            active_devices,
            inactive_devices: total_devices - active_devices,
            total_sensor_readings: tables.readings.len() as u64,
        })
    }
}

#[async_trait]
impl ReadingRepository for InMemoryDatabase {
    async fn create(&self, reading: NewReading) -> Result<Reading, RepoError> {
        self.insert_reading_at(reading, Utc::now()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reading>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.readings.get(&id).cloned())
    }

    async fn list_by_device(
        &self,
        filter: &DeviceReadingsFilter,
    ) -> Result<Page<Reading>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Reading> = tables
            .readings
            .values()
            .filter(|r| r.device_id == filter.device_id)
            .cloned()
            .collect();

        newest_first(&mut rows, |r| (r.timestamp, r.id));
        Ok(window(rows, filter.page))
    }

    async fn list_by_date(
        &self,
        device_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Reading>, RepoError> {
        let (start, end) = day_bounds(date);
        Ok(self
            .readings_between(device_id, |ts| ts >= start && ts < end)
            .await)
    }

    async fn list_by_range(
        &self,
        device_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, RepoError> {
        Ok(self
            .readings_between(device_id, |ts| ts >= start && ts <= end)
            .await)
    }
}

#[async_trait]
impl ExperimentRepository for InMemoryDatabase {
    async fn create(&self, draft: ExperimentDraft) -> Result<Experiment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.ensure_reactor(draft.reactor_id)?;

        let id = next(&mut tables.seq.experiments);
        let experiment = Experiment::from_draft(id, draft, Utc::now());
        tables.experiments.insert(id, experiment.clone());
        Ok(experiment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Experiment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .experiments
            .get(&id)
            .filter(|e| !e.is_deleted())
            .cloned())
    }

    async fn update(&self, id: i64, draft: ExperimentDraft) -> Result<Experiment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.experiments.get(&id).is_some_and(|e| !e.is_deleted()) {
            return Err(not_found("experiment", id));
        }
        tables.ensure_reactor(draft.reactor_id)?;

        let experiment = tables
            .experiments
            .get_mut(&id)
            .ok_or_else(|| not_found("experiment", id))?;
        experiment.apply(draft);
        Ok(experiment.clone())
    }

    async fn list(&self, filter: &ExperimentFilter) -> Result<Page<Experiment>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Experiment> = tables
            .experiments
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        newest_first(&mut rows, |e| (e.created_at, e.id));
        Ok(window(rows, filter.page))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let experiment = tables
            .experiments
            .get_mut(&id)
            .filter(|e| !e.is_deleted())
            .ok_or_else(|| not_found("experiment", id))?;

        experiment.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl DashboardRepository for InMemoryDatabase {
    async fn dashboard_stats(
        &self,
        include_users: bool,
        today: NaiveDate,
    ) -> Result<DashboardStats, RepoError> {
        let tables = self.tables.read().await;
        let mut stats = DashboardStats::default();

        if include_users {
            let total = tables.users.len() as u64;
            let active = tables.users.values().filter(|r| r.user.is_active).count() as u64;
            stats.total_users = Some(total);
            stats.active_users = Some(active);
            stats.inactive_users = Some(total - active);
        }

        stats.total_devices = tables.devices.len() as u64;
        stats.active_devices = tables.devices.values().filter(|d| d.status).count() as u64;
        stats.inactive_devices = stats.total_devices - stats.active_devices;

        let reactors: Vec<&Reactor> = tables.reactors.values().filter(|r| !r.is_deleted()).collect();
        stats.total_reactors = reactors.len() as u64;
        stats.active_reactors = reactors
            .iter()
            .filter(|r| r.status == ReactorStatus::Active)
            .count() as u64;
        stats.inactive_reactors = stats.total_reactors - stats.active_reactors;

        let experiments: Vec<&Experiment> = tables
            .experiments
            .values()
            .filter(|e| !e.is_deleted())
            .collect();
        let (week_start, week_end) = week_bounds(today);
        stats.experiments_run_today = experiments.iter().filter(|e| e.date == today).count() as u64;
        stats.experiments_run_this_week = experiments
            .iter()
            .filter(|e| e.date >= week_start && e.date < week_end)
            .count() as u64;

        if !experiments.is_empty() {
            let total: i64 = experiments.iter().map(|e| e.duration_seconds()).sum();
            stats.average_experiment_duration_seconds = total as f64 / experiments.len() as f64;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeDelta, TimeZone};
    use labtrack_core::domain::{ExposureConditions, MaterialFeedstock, ReadingPayload, Role};

    fn new_user(name: &str, email: &str, role: Role, is_active: bool) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            phone_number: None,
            role,
            is_active,
        }
    }

    fn new_reactor(name: &str, status: ReactorStatus) -> NewReactor {
        NewReactor {
            name: name.to_string(),
            status,
            pathway: None,
            pdf_url: None,
        }
    }

    fn draft(reactor_id: i64, batch: &str, date: NaiveDate) -> ExperimentDraft {
        ExperimentDraft {
            batch_id: batch.to_string(),
            reactor_id,
            operator: "Otieno".to_string(),
            date,
            block_id: "BLK-1".to_string(),
            time_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            material_feedstock: MaterialFeedstock::default(),
            exposure_conditions: ExposureConditions::default(),
            analytical_tests: Vec::new(),
        }
    }

    fn co2(value: f64) -> ReadingPayload {
        ReadingPayload {
            co2: Some(value),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation() {
        let db = InMemoryDatabase::new();
        UserRepository::create(&db, new_user("A", "a@lab.io", Role::User, true), "h".into())
            .await
            .unwrap();

        let err = UserRepository::create(&db, new_user("B", "a@lab.io", Role::User, true), "h".into())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn phone_number_can_be_cleared() {
        let db = InMemoryDatabase::new();
        let mut account = new_user("A", "a@lab.io", Role::User, true);
        account.phone_number = Some("+254722000000".into());
        let user = UserRepository::create(&db, account, "h".into()).await.unwrap();

        let renamed = UserUpdate {
            name: Some("Amina".into()),
            ..Default::default()
        };
        let user = UserRepository::update(&db, user.id, renamed).await.unwrap();
        assert_eq!(user.phone_number.as_deref(), Some("+254722000000"));

        let cleared = UserUpdate {
            phone_number: Some(None),
            ..Default::default()
        };
        let user = UserRepository::update(&db, user.id, cleared).await.unwrap();
        assert!(user.phone_number.is_none());
    }

    #[tokio::test]
    async fn count_equals_items_across_all_pages() {
        let db = InMemoryDatabase::new();
        for i in 0..23 {
            let status = if i % 3 == 0 {
                ReactorStatus::Maintenance
            } else {
                ReactorStatus::Active
            };
            ReactorRepository::create(&db, new_reactor(&format!("Kiln {i}"), status))
                .await
                .unwrap();
        }

        let mut filter = ReactorFilter::default();
        filter.status = Some(ReactorStatus::Active);

        let mut seen = Vec::new();
        let mut page_no = 1;
        loop {
            filter.page = PageRequest::new(page_no, 4).unwrap();
            let page = ReactorRepository::list(&db, &filter).await.unwrap();
            seen.extend(page.items.iter().map(|r| r.id));
            if !page.pagination.has_next {
                assert_eq!(page.pagination.total, seen.len() as u64);
                break;
            }
            page_no = page.pagination.next_page;
        }

        seen.dedup();
        assert_eq!(seen.len(), 15);
    }

    #[tokio::test]
    async fn lists_are_newest_first() {
        let db = InMemoryDatabase::new();
        for name in ["first", "second", "third"] {
            ReactorRepository::create(&db, new_reactor(name, ReactorStatus::Active))
                .await
                .unwrap();
        }

        let page = ReactorRepository::list(&db, &ReactorFilter::default()).await.unwrap();
        let names: Vec<&str> = page.items.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn soft_deleted_reactor_disappears() {
        let db = InMemoryDatabase::new();
        let reactor = ReactorRepository::create(&db, new_reactor("R", ReactorStatus::Active))
            .await
            .unwrap();

        ReactorRepository::delete(&db, reactor.id).await.unwrap();

        assert!(ReactorRepository::find_by_id(&db, reactor.id).await.unwrap().is_none());
        assert!(matches!(
            ReactorRepository::delete(&db, reactor.id).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
        assert!(matches!(
            ReactorRepository::update(&db, reactor.id, ReactorUpdate::default())
                .await
                .unwrap_err(),
            RepoError::NotFound(_)
        ));
        let page = ReactorRepository::list(&db, &ReactorFilter::default()).await.unwrap();
        assert_eq!(page.pagination.total, 0);

        let err = DeviceRepository::create(
            &db,
            NewDevice {
                name: "probe".into(),
                reactor_id: reactor.id,
                status: true,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn readings_by_date_and_range() {
        let db = InMemoryDatabase::new();
        let reactor = ReactorRepository::create(&db, new_reactor("R", ReactorStatus::Active))
            .await
            .unwrap();
        let device = DeviceRepository::create(
            &db,
            NewDevice {
                name: "probe".into(),
                reactor_id: reactor.id,
                status: true,
            },
        )
        .await
        .unwrap();

        let day = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        for hours in [25, 1, 12, 23] {
            db.insert_reading_at(
                NewReading {
                    device_id: device.id,
                    payload: co2(hours as f64),
                },
                day + TimeDelta::hours(hours),
            )
            .await
            .unwrap();
        }

        let on_day = ReadingRepository::list_by_date(&db, device.id, day.date_naive())
            .await
            .unwrap();
        let values: Vec<f64> = on_day.iter().filter_map(|r| r.payload.co2).collect();
        assert_eq!(values, [1.0, 12.0, 23.0]);

        let ranged = ReadingRepository::list_by_range(
            &db,
            device.id,
            day + TimeDelta::hours(12),
            day + TimeDelta::hours(25),
        )
        .await
        .unwrap();
        assert_eq!(ranged.len(), 3);

        let newest = ReadingRepository::list_by_device(
            &db,
            &DeviceReadingsFilter {
                device_id: device.id,
                page: PageRequest::new(1, 2).unwrap(),
            },
        )
        .await
        .unwrap();
        assert_eq!(newest.items[0].payload.co2, Some(25.0));
        assert_eq!(newest.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn unknown_device_reading_is_rejected() {
        let db = InMemoryDatabase::new();
        let err = ReadingRepository::create(
            &db,
            NewReading {
                device_id: 99,
                payload: co2(1.0),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn dashboard_counts() {
        let db = InMemoryDatabase::new();
        UserRepository::create(&db, new_user("A", "a@lab.io", Role::Admin, true), "h".into())
            .await
            .unwrap();
        UserRepository::create(&db, new_user("B", "b@lab.io", Role::User, false), "h".into())
            .await
            .unwrap();
        let reactor = ReactorRepository::create(&db, new_reactor("R", ReactorStatus::Active))
            .await
            .unwrap();
        ReactorRepository::create(&db, new_reactor("S", ReactorStatus::Inactive))
            .await
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        ExperimentRepository::create(&db, draft(reactor.id, "B1", today))
            .await
            .unwrap();
        ExperimentRepository::create(&db, draft(reactor.id, "B2", today - TimeDelta::days(2)))
            .await
            .unwrap();

        let admin_view = db.dashboard_stats(true, today).await.unwrap();
        assert_eq!(admin_view.total_users, Some(2));
        assert_eq!(admin_view.inactive_users, Some(1));
        assert_eq!(admin_view.total_reactors, 2);
        assert_eq!(admin_view.active_reactors, 1);
        assert_eq!(admin_view.experiments_run_today, 1);
        assert_eq!(admin_view.experiments_run_this_week, 2);
        assert_eq!(admin_view.average_experiment_duration_seconds, 3600.0);

        let user_view = db.dashboard_stats(false, today).await.unwrap();
        assert!(user_view.total_users.is_none());
    }

    #[tokio::test]
    async fn experiment_search_spans_batch_operator_and_block() {
        let db = InMemoryDatabase::new();
        let reactor = ReactorRepository::create(&db, new_reactor("R", ReactorStatus::Active))
            .await
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        ExperimentRepository::create(&db, draft(reactor.id, "CARB-01", date))
            .await
            .unwrap();
        ExperimentRepository::create(&db, draft(reactor.id, "MIX-02", date))
            .await
            .unwrap();

        let filter = ExperimentFilter::new(PageRequest::default(), Some("carb".into()));
        let page = ExperimentRepository::list(&db, &filter).await.unwrap();
        assert_eq!(page.items.len(), 1);

        let filter = ExperimentFilter::new(PageRequest::default(), Some("otieno".into()));
        let page = ExperimentRepository::list(&db, &filter).await.unwrap();
        assert_eq!(page.items.len(), 2);
    }
}
