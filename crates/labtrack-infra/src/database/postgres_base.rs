use std::marker::PhantomData;

use sea_orm::{
    DbConn, DbErr, EntityTrait, PaginatorTrait, PrimaryKeyTrait, QuerySelect, Select, SqlErr,
};

use labtrack_core::error::RepoError;
use labtrack_core::pagination::{Page, PageRequest};

pub(crate) use super::not_found;

/// Generic PostgreSQL repository over one SeaORM entity.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Run one window of `select` and a count over the very same query value,
    /// so both carry identical predicates.
    pub(crate) async fn paginate(
        &self,
        select: Select<E>,
        page: PageRequest,
    ) -> Result<Page<E::Model>, RepoError>
    where
        E::Model: Sync,
    {
        let items = select
            .clone()
            .offset(page.offset())
            .limit(page.page_size())
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        let total = select.count(&self.db).await.map_err(repo_err)?;

        Ok(Page::new(items, page, total))
    }

    /// Hard delete by primary key. Missing rows are `NotFound`.
    pub(crate) async fn delete_row(&self, id: i64, what: &str) -> Result<(), RepoError>
    where
        i64: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(not_found(what, id));
        }

        Ok(())
    }
}

/// Classify a SeaORM error at the storage boundary.
pub(crate) fn repo_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Unique constraint violated");
            return RepoError::Constraint("record already exists".to_string());
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Foreign key constraint violated");
            return RepoError::ForeignKey("referenced record does not exist".to_string());
        }
        _ => {}
    }

    match err {
        DbErr::RecordNotFound(msg) => RepoError::NotFound(msg),
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}
