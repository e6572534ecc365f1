use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use labtrack_core::domain::{NewReactor, Reactor, ReactorUpdate};
use labtrack_core::error::RepoError;
use labtrack_core::filter::{ReactorFilter, search_pattern};
use labtrack_core::pagination::Page;
use labtrack_core::ports::ReactorRepository;

use super::{PostgresReactorRepository, lower_like, reactor};
use crate::database::postgres_base::{not_found, repo_err};

/// Fetch a reactor that has not been soft-deleted.
async fn find_live<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<reactor::Model>, RepoError> {
    reactor::Entity::find_by_id(id)
        .filter(reactor::Column::DeletedAt.is_null())
        .one(conn)
        .await
        .map_err(repo_err)
}

/// Foreign-key guard for rows that reference a reactor. Soft-deleted reactors count as missing.
pub(super) async fn ensure_reactor<C: ConnectionTrait>(conn: &C, id: i64) -> Result<(), RepoError> {
    match find_live(conn, id).await? {
        Some(_) => Ok(()),
        None => Err(RepoError::ForeignKey(format!("reactor with id {id} does not exist"))),
    }
}

#[async_trait]
impl ReactorRepository for PostgresReactorRepository {
    async fn create(&self, reactor: NewReactor) -> Result<Reactor, RepoError> {
        let model = reactor::ActiveModel {
            name: Set(reactor.name),
            status: Set(reactor.status.as_str().to_string()),
            pathway: Set(reactor.pathway),
            pdf_url: Set(reactor.pdf_url),
            deleted_at: Set(None),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        model.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reactor>, RepoError> {
        find_live(&self.db, id).await?.map(Reactor::try_from).transpose()
    }

    async fn update(&self, id: i64, update: ReactorUpdate) -> Result<Reactor, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let model = find_live(&txn, id)
            .await?
            .ok_or_else(|| not_found("reactor", id))?;

        let mut active = model.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(status) = update.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(pathway) = update.pathway {
            active.pathway = Set(Some(pathway));
        }
        if let Some(pdf_url) = update.pdf_url {
            active.pdf_url = Set(Some(pdf_url));
        }

        let model = active.update(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        model.try_into()
    }

    async fn list(&self, filter: &ReactorFilter) -> Result<Page<Reactor>, RepoError> {
        let mut condition = Condition::all().add(reactor::Column::DeletedAt.is_null());

        if let Some(term) = &filter.search {
            condition = condition.add(lower_like(reactor::Column::Name, &search_pattern(term)));
        }
        if let Some(status) = filter.status {
            condition = condition.add(reactor::Column::Status.eq(status.as_str()));
        }
        if let Some(pathway) = &filter.pathway {
            condition = condition.add(reactor::Column::Pathway.eq(pathway.as_str()));
        }

        let select = reactor::Entity::find()
            .filter(condition)
            .order_by_desc(reactor::Column::CreatedAt)
            .order_by_desc(reactor::Column::Id);

        self.paginate(select, filter.page)
            .await?
            .try_map(Reactor::try_from)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let result = reactor::Entity::update_many()
            .col_expr(reactor::Column::DeletedAt, Expr::value(now))
            .filter(reactor::Column::Id.eq(id))
            .filter(reactor::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(not_found("reactor", id));
        }
        Ok(())
    }
}
