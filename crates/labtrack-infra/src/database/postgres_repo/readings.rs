use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

use labtrack_core::domain::{NewReading, Reading};
use labtrack_core::error::RepoError;
use labtrack_core::filter::DeviceReadingsFilter;
use labtrack_core::pagination::Page;
use labtrack_core::ports::ReadingRepository;
use labtrack_core::time::day_bounds;

use super::{PostgresReadingRepository, reading};
use crate::database::postgres_base::repo_err;

fn tz(instant: DateTime<Utc>) -> DateTimeWithTimeZone {
    instant.into()
}

fn oldest_first(select: Select<reading::Entity>) -> Select<reading::Entity> {
    select
        .order_by_asc(reading::Column::Timestamp)
        .order_by_asc(reading::Column::Id)
}

impl PostgresReadingRepository {
    async fn fetch(&self, select: Select<reading::Entity>) -> Result<Vec<Reading>, RepoError> {
        oldest_first(select)
            .all(&self.db)
            .await
            .map_err(repo_err)?
            .into_iter()
            .map(Reading::try_from)
            .collect()
    }
}

#[async_trait]
impl ReadingRepository for PostgresReadingRepository {
    async fn create(&self, new_reading: NewReading) -> Result<Reading, RepoError> {
        let payload = serde_json::to_value(new_reading.payload)
            .map_err(|e| RepoError::Query(e.to_string()))?;

        // An unknown device surfaces as a foreign key violation.
        let model = reading::ActiveModel {
            device_id: Set(new_reading.device_id),
            payload: Set(payload),
            timestamp: Set(tz(Utc::now())),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        model.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reading>, RepoError> {
        reading::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .map(Reading::try_from)
            .transpose()
    }

    async fn list_by_device(&self, filter: &DeviceReadingsFilter) -> Result<Page<Reading>, RepoError> {
        let select = reading::Entity::find()
            .filter(reading::Column::DeviceId.eq(filter.device_id))
            .order_by_desc(reading::Column::Timestamp)
            .order_by_desc(reading::Column::Id);

        self.paginate(select, filter.page)
            .await?
            .try_map(Reading::try_from)
    }

    async fn list_by_date(&self, device_id: i64, date: NaiveDate) -> Result<Vec<Reading>, RepoError> {
        let (start, end) = day_bounds(date);

        self.fetch(
            reading::Entity::find()
                .filter(reading::Column::DeviceId.eq(device_id))
                .filter(reading::Column::Timestamp.gte(tz(start)))
                .filter(reading::Column::Timestamp.lt(tz(end))),
        )
        .await
    }

    async fn list_by_range(
        &self,
        device_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, RepoError> {
        self.fetch(
            reading::Entity::find()
                .filter(reading::Column::DeviceId.eq(device_id))
                .filter(reading::Column::Timestamp.between(tz(start), tz(end))),
        )
        .await
    }
}
