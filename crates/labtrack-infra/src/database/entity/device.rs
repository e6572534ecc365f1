//! Device entity for SeaORM.

use sea_orm::entity::prelude::*;

use labtrack_core::domain::Device;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub reactor_id: i64,
    pub status: bool,
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
    #[sea_orm(has_many = "super::reading::Entity")]
    Reading,
}

impl Related<super::reactor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reactor.def()
    }
}

impl Related<super::reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reading.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Device {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            reactor_id: model.reactor_id,
            status: model.status,
            created_at: model.created_at.into(),
        }
    }
}
