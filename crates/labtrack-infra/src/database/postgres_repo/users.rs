use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use labtrack_core::domain::{Credentials, DashboardStats, NewUser, User, UserUpdate};
use labtrack_core::error::RepoError;
use labtrack_core::filter::{UserFilter, search_pattern};
use labtrack_core::pagination::Page;
use labtrack_core::ports::{DashboardRepository, UserRepository};
use labtrack_core::time::{run_seconds, week_bounds};

use super::{PostgresUserRepository, device, experiment, lower_like, reactor, user};
use crate::database::postgres_base::{not_found, repo_err};
use crate::mail::mask_email;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: NewUser, password_hash: String) -> Result<User, RepoError> {
        tracing::debug!(user_email = %mask_email(&new_user.email), "Creating user");

        let model = user::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            phone_number: Set(new_user.phone_number),
            role: Set(new_user.role.as_str().to_string()),
            is_active: Set(new_user.is_active),
            password_hash: Set(password_hash),
            refresh_token: Set(None),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        model.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, RepoError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .map(Credentials::try_from)
            .transpose()
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<User, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let model = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| not_found("user", id))?;

        let mut active = model.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(phone) = update.phone_number {
            active.phone_number = Set(phone);
        }
        if let Some(role) = update.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }

        let model = active.update(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        model.try_into()
    }

    async fn update_password(&self, id: i64, password_hash: String) -> Result<(), RepoError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(not_found("user", id));
        }
        Ok(())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, RepoError> {
        let mut condition = Condition::all();

        if let Some(term) = &filter.search {
            let pattern = search_pattern(term);
            condition = condition.add(
                Condition::any()
                    .add(lower_like(user::Column::Name, &pattern))
                    .add(lower_like(user::Column::Email, &pattern)),
            );
        }
        if let Some(is_active) = filter.is_active {
            condition = condition.add(user::Column::IsActive.eq(is_active));
        }
        if let Some(role) = filter.role {
            condition = condition.add(user::Column::Role.eq(role.as_str()));
        }

        let select = user::Entity::find()
            .filter(condition)
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id);

        self.paginate(select, filter.page)
            .await?
            .try_map(User::try_from)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.delete_row(id, "user").await
    }

    async fn refresh_token(&self, id: i64) -> Result<Option<String>, RepoError> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| not_found("user", id))?;

        Ok(model.refresh_token)
    }

    async fn set_refresh_token(&self, id: i64, token: Option<String>) -> Result<(), RepoError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::RefreshToken, Expr::value(token))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(not_found("user", id));
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardRepository for PostgresUserRepository {
    async fn dashboard_stats(
        &self,
        include_users: bool,
        today: NaiveDate,
    ) -> Result<DashboardStats, RepoError> {
        let db = &self.db;
        let mut stats = DashboardStats::default();

        if include_users {
            let total = user::Entity::find().count(db).await.map_err(repo_err)?;
            let active = user::Entity::find()
                .filter(user::Column::IsActive.eq(true))
                .count(db)
                .await
                .map_err(repo_err)?;
            stats.total_users = Some(total);
            stats.active_users = Some(active);
            stats.inactive_users = Some(total - active);
        }

        stats.total_devices = device::Entity::find().count(db).await.map_err(repo_err)?;
        stats.active_devices = device::Entity::find()
            .filter(device::Column::Status.eq(true))
            .count(db)
            .await
            .map_err(repo_err)?;
        stats.inactive_devices = stats.total_devices - stats.active_devices;

        let live_reactors = reactor::Entity::find().filter(reactor::Column::DeletedAt.is_null());
        stats.total_reactors = live_reactors.clone().count(db).await.map_err(repo_err)?;
        stats.active_reactors = live_reactors
            .filter(reactor::Column::Status.eq("active"))
            .count(db)
            .await
            .map_err(repo_err)?;
        stats.inactive_reactors = stats.total_reactors - stats.active_reactors;

        let live_experiments =
            experiment::Entity::find().filter(experiment::Column::DeletedAt.is_null());
        stats.experiments_run_today = live_experiments
            .clone()
            .filter(experiment::Column::Date.eq(today))
            .count(db)
            .await
            .map_err(repo_err)?;

        let (week_start, week_end) = week_bounds(today);
        stats.experiments_run_this_week = live_experiments
            .clone()
            .filter(experiment::Column::Date.gte(week_start))
            .filter(experiment::Column::Date.lt(week_end))
            .count(db)
            .await
            .map_err(repo_err)?;

        let runs: Vec<(NaiveTime, NaiveTime)> = live_experiments
            .select_only()
            .column(experiment::Column::TimeStart)
            .column(experiment::Column::TimeEnd)
            .into_tuple()
            .all(db)
            .await
            .map_err(repo_err)?;

        if !runs.is_empty() {
            let total: i64 = runs.iter().map(|(start, end)| run_seconds(*start, *end)).sum();
            stats.average_experiment_duration_seconds = total as f64 / runs.len() as f64;
        }

        Ok(stats)
    }
}
