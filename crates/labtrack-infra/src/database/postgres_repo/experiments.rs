use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use labtrack_core::domain::{Experiment, ExperimentDraft};
use labtrack_core::error::RepoError;
use labtrack_core::filter::{ExperimentFilter, search_pattern};
use labtrack_core::pagination::Page;
use labtrack_core::ports::ExperimentRepository;

use super::reactors::ensure_reactor;
use super::{PostgresExperimentRepository, experiment, lower_like};
use crate::database::postgres_base::{not_found, repo_err};

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RepoError> {
    serde_json::to_value(value).map_err(|e| RepoError::Query(e.to_string()))
}

/// Every writable column set from the draft; identity and timestamps untouched.
fn draft_columns(draft: ExperimentDraft) -> Result<experiment::ActiveModel, RepoError> {
    Ok(experiment::ActiveModel {
        material_feedstock: Set(to_json(&draft.material_feedstock)?),
        exposure_conditions: Set(to_json(&draft.exposure_conditions)?),
        analytical_tests: Set(to_json(&draft.analytical_tests)?),
        batch_id: Set(draft.batch_id),
        reactor_id: Set(draft.reactor_id),
        operator: Set(draft.operator),
        date: Set(draft.date),
        block_id: Set(draft.block_id),
        time_start: Set(draft.time_start),
        time_end: Set(draft.time_end),
        ..Default::default()
    })
}

async fn find_live<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<Option<experiment::Model>, RepoError> {
    experiment::Entity::find_by_id(id)
        .filter(experiment::Column::DeletedAt.is_null())
        .one(conn)
        .await
        .map_err(repo_err)
}

#[async_trait]
impl ExperimentRepository for PostgresExperimentRepository {
    async fn create(&self, draft: ExperimentDraft) -> Result<Experiment, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        ensure_reactor(&txn, draft.reactor_id).await?;

        let mut active = draft_columns(draft)?;
        active.deleted_at = Set(None);
        active.created_at = Set(Utc::now().into());

        let model = active.insert(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        model.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Experiment>, RepoError> {
        find_live(&self.db, id)
            .await?
            .map(Experiment::try_from)
            .transpose()
    }

    async fn update(&self, id: i64, draft: ExperimentDraft) -> Result<Experiment, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        find_live(&txn, id)
            .await?
            .ok_or_else(|| not_found("experiment", id))?;
        ensure_reactor(&txn, draft.reactor_id).await?;

        let mut active = draft_columns(draft)?;
        active.id = ActiveValue::Unchanged(id);

        let model = active.update(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        model.try_into()
    }

    async fn list(&self, filter: &ExperimentFilter) -> Result<Page<Experiment>, RepoError> {
        let mut condition = Condition::all().add(experiment::Column::DeletedAt.is_null());

        if let Some(term) = &filter.search {
            let pattern = search_pattern(term);
            condition = condition.add(
                Condition::any()
                    .add(lower_like(experiment::Column::BatchId, &pattern))
                    .add(lower_like(experiment::Column::Operator, &pattern))
                    .add(lower_like(experiment::Column::BlockId, &pattern)),
            );
        }
        if let Some(reactor_id) = filter.reactor_id {
            condition = condition.add(experiment::Column::ReactorId.eq(reactor_id));
        }
        if let Some(date) = filter.date {
            condition = condition.add(experiment::Column::Date.eq(date));
        }

        let select = experiment::Entity::find()
            .filter(condition)
            .order_by_desc(experiment::Column::CreatedAt)
            .order_by_desc(experiment::Column::Id);

        self.paginate(select, filter.page)
            .await?
            .try_map(Experiment::try_from)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let result = experiment::Entity::update_many()
            .col_expr(experiment::Column::DeletedAt, Expr::value(now))
            .filter(experiment::Column::Id.eq(id))
            .filter(experiment::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(not_found("experiment", id));
        }
        Ok(())
    }
}
