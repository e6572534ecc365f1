//! Reactor entity for SeaORM.

use sea_orm::entity::prelude::*;

use labtrack_core::domain::Reactor;
use labtrack_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reactors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub status: String,
    pub pathway: Option<String>,
    pub pdf_url: Option<String>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::device::Entity")]
    Device,
    #[sea_orm(has_many = "super::experiment::Entity")]
    Experiment,
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl Related<super::experiment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Experiment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Reactor {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            status: model
                .status
                .parse()
                .map_err(|_| RepoError::Query(format!("reactor {} has unknown status", model.id)))?,
            id: model.id,
            name: model.name,
            pathway: model.pathway,
            pdf_url: model.pdf_url,
            deleted_at: model.deleted_at.map(Into::into),
            created_at: model.created_at.into(),
        })
    }
}
