//! User entity for SeaORM.

use sea_orm::entity::prelude::*;

use labtrack_core::domain::{Credentials, User};
use labtrack_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub password_hash: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub refresh_token: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            role: model
                .role
                .parse()
                .map_err(|_| RepoError::Query(format!("user {} has unknown role", model.id)))?,
            id: model.id,
            name: model.name,
            email: model.email,
            phone_number: model.phone_number,
            is_active: model.is_active,
            created_at: model.created_at.into(),
        })
    }
}

impl TryFrom<Model> for Credentials {
    type Error = RepoError;

    fn try_from(mut model: Model) -> Result<Self, Self::Error> {
        let password_hash = std::mem::take(&mut model.password_hash);
        Ok(Self {
            user: model.try_into()?,
            password_hash,
        })
    }
}
