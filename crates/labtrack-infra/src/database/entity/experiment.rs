//! Experiment entity for SeaORM. Feedstock, exposure and tests are JSONB documents.

use sea_orm::entity::prelude::*;

use labtrack_core::domain::Experiment;
use labtrack_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "experiments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub batch_id: String,
    pub reactor_id: i64,
    pub operator: String,
    pub date: Date,
    pub block_id: String,
    pub time_start: Time,
    pub time_end: Time,
    #[sea_orm(column_type = "JsonBinary")]
    pub material_feedstock: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub exposure_conditions: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub analytical_tests: Json,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reactor::Entity",
        from = "Column::ReactorId",
        to = "super::reactor::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Reactor,
}

impl Related<super::reactor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reactor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn document<T: serde::de::DeserializeOwned>(id: i64, field: &str, value: Json) -> Result<T, RepoError> {
    serde_json::from_value(value)
        .map_err(|e| RepoError::Query(format!("experiment {id} {field}: {e}")))
}

impl TryFrom<Model> for Experiment {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = model.id;
        Ok(Self {
            material_feedstock: document(id, "material_feedstock", model.material_feedstock)?,
            exposure_conditions: document(id, "exposure_conditions", model.exposure_conditions)?,
            analytical_tests: document(id, "analytical_tests", model.analytical_tests)?,
            id,
            batch_id: model.batch_id,
            reactor_id: model.reactor_id,
            operator: model.operator,
            date: model.date,
            block_id: model.block_id,
            time_start: model.time_start,
            time_end: model.time_end,
            deleted_at: model.deleted_at.map(Into::into),
            created_at: model.created_at.into(),
        })
    }
}
