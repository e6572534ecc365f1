use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use labtrack_core::domain::{Device, DeviceStats, DeviceUpdate, NewDevice};
use labtrack_core::error::RepoError;
use labtrack_core::filter::DeviceFilter;
use labtrack_core::ports::DeviceRepository;

use super::reactors::ensure_reactor;
use super::{PostgresDeviceRepository, device, reading};
use crate::database::postgres_base::{not_found, repo_err};

#[async_trait]
impl DeviceRepository for PostgresDeviceRepository {
    async fn create(&self, new_device: NewDevice) -> Result<Device, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        ensure_reactor(&txn, new_device.reactor_id).await?;

        let model = device::ActiveModel {
            name: Set(new_device.name),
            reactor_id: Set(new_device.reactor_id),
            status: Set(new_device.status),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Device>, RepoError> {
        let model = device::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, id: i64, update: DeviceUpdate) -> Result<Device, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let model = device::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| not_found("device", id))?;

        let mut active = model.into_active_model();
        if let Some(reactor_id) = update.reactor_id {
            ensure_reactor(&txn, reactor_id).await?;
            active.reactor_id = Set(reactor_id);
        }
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(status) = update.status {
            active.status = Set(status);
        }

        let model = active.update(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        Ok(model.into())
    }

    async fn list(&self, filter: &DeviceFilter) -> Result<Vec<Device>, RepoError> {
        let mut select = device::Entity::find();
        if let Some(reactor_id) = filter.reactor_id {
            select = select.filter(device::Column::ReactorId.eq(reactor_id));
        }

        let models = select
            .order_by_desc(device::Column::CreatedAt)
            .order_by_desc(device::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        // Readings go with the device through ON DELETE CASCADE.
        self.delete_row(id, "device").await
    }

    async fn stats(&self) -> Result<DeviceStats, RepoError> {
        let total_devices = device::Entity::find()
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        let active_devices = device::Entity::find()
            .filter(device::Column::Status.eq(true))
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        let total_sensor_readings = reading::Entity::find()
            .count(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(DeviceStats {
            total_devices,
            active_devices,
            inactive_devices: total_devices - active_devices,
            total_sensor_readings,
        })
    }
}
