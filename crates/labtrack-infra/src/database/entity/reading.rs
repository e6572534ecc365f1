//! Sensor reading entity for SeaORM.

use sea_orm::entity::prelude::*;

use labtrack_core::domain::Reading;
use labtrack_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub device_id: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Json,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::DeviceId",
        to = "super::device::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Device,
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Reading {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            payload: serde_json::from_value(model.payload)
                .map_err(|e| RepoError::Query(format!("reading {} payload: {e}", model.id)))?,
            id: model.id,
            device_id: model.device_id,
            timestamp: model.timestamp.into(),
        })
    }
}
