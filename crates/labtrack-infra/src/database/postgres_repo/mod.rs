//! PostgreSQL repository implementations.

mod devices;
mod experiments;
mod reactors;
mod readings;
mod users;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, IntoSimpleExpr};

use super::entity::{device, experiment, reactor, reading, user};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository. Also serves dashboard statistics.
pub type PostgresUserRepository = PostgresBaseRepository<user::Entity>;

pub type PostgresReactorRepository = PostgresBaseRepository<reactor::Entity>;

pub type PostgresDeviceRepository = PostgresBaseRepository<device::Entity>;

pub type PostgresReadingRepository = PostgresBaseRepository<reading::Entity>;

pub type PostgresExperimentRepository = PostgresBaseRepository<experiment::Entity>;

/// `LOWER(col) LIKE pattern`; pair with `search_pattern` for substring search.
fn lower_like<C: ColumnTrait>(col: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(col.into_simple_expr())).like(pattern)
}
