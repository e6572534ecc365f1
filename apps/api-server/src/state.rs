//! Application state - shared across all handlers.

use std::sync::Arc;

use labtrack_core::ports::{
    DashboardRepository, DeviceRepository, ExperimentRepository, JobQueue, Mailer,
    PasswordService, ReactorRepository, ReadingRepository, ReportGenerator, TokenMaker,
    UserRepository,
};
use labtrack_infra::{
    Argon2PasswordService, CsvReportGenerator, InMemoryDatabase, InMemoryJobQueue,
    InMemoryJobQueueConfig, JwtTokenService, LogMailer, email_job_handler,
};

use crate::config::AppConfig;

/// Reasons the server refuses to start.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(not(feature = "postgres"), allow(dead_code))]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Database(String),
    #[error("migrations failed: {0}")]
    Migration(String),
}

/// One handle per repository port.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub reactors: Arc<dyn ReactorRepository>,
    pub devices: Arc<dyn DeviceRepository>,
    pub readings: Arc<dyn ReadingRepository>,
    pub experiments: Arc<dyn ExperimentRepository>,
    pub dashboard: Arc<dyn DashboardRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self::shared(Arc::new(InMemoryDatabase::new()))
    }

    /// Every port backed by the same in-memory store.
    pub fn shared(db: Arc<InMemoryDatabase>) -> Self {
        Self {
            users: db.clone(),
            reactors: db.clone(),
            devices: db.clone(),
            readings: db.clone(),
            experiments: db.clone(),
            dashboard: db,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(conn: sea_orm::DbConn) -> Self {
        use labtrack_infra::database::{
            PostgresDeviceRepository, PostgresExperimentRepository, PostgresReactorRepository,
            PostgresReadingRepository, PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            reactors: Arc::new(PostgresReactorRepository::new(conn.clone())),
            devices: Arc::new(PostgresDeviceRepository::new(conn.clone())),
            readings: Arc::new(PostgresReadingRepository::new(conn.clone())),
            experiments: Arc::new(PostgresExperimentRepository::new(conn.clone())),
            dashboard: Arc::new(PostgresUserRepository::new(conn)),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub reactors: Arc<dyn ReactorRepository>,
    pub devices: Arc<dyn DeviceRepository>,
    pub readings: Arc<dyn ReadingRepository>,
    pub experiments: Arc<dyn ExperimentRepository>,
    pub dashboard: Arc<dyn DashboardRepository>,
    pub tokens: Arc<dyn TokenMaker>,
    pub passwords: Arc<dyn PasswordService>,
    pub jobs: Arc<dyn JobQueue>,
    pub reports: Arc<dyn ReportGenerator>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// A configured database that cannot be reached or migrated is fatal;
    /// only a missing `DATABASE_URL` selects in-memory storage.
    pub async fn new(config: AppConfig) -> Result<Self, StartupError> {
        let repos = Self::connect_storage(&config).await?;
        Ok(Self::build(config, repos, Arc::new(LogMailer::default())).await)
    }

    /// Wire the state from explicit parts and start the email workers.
    pub async fn build(config: AppConfig, repos: Repositories, mailer: Arc<dyn Mailer>) -> Self {
        let jobs = InMemoryJobQueue::new(InMemoryJobQueueConfig {
            max_size: config.email_queue_size,
            workers: config.email_workers,
        });
        if let Err(e) = jobs.start_worker(email_job_handler(mailer)).await {
            tracing::error!(error = %e, "Failed to start email workers");
        }

        let tokens = Arc::new(JwtTokenService::new(config.jwt.clone()));

        tracing::info!("Application state initialized");

        Self {
            config: Arc::new(config),
            users: repos.users,
            reactors: repos.reactors,
            devices: repos.devices,
            readings: repos.readings,
            experiments: repos.experiments,
            dashboard: repos.dashboard,
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
            jobs: Arc::new(jobs),
            reports: Arc::new(CsvReportGenerator),
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect_storage(config: &AppConfig) -> Result<Repositories, StartupError> {
        use labtrack_infra::{DatabaseConfig, connect};
        use migration::{Migrator, MigratorTrait};

        let Some(settings) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Repositories::in_memory());
        };

        let db_config = DatabaseConfig {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
        };

        let conn = connect(&db_config)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;

        if settings.run_migrations {
            Migrator::up(&conn, None)
                .await
                .map_err(|e| StartupError::Migration(e.to_string()))?;
            tracing::info!("Migrations applied");
        }

        Ok(Repositories::postgres(conn))
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_storage(_config: &AppConfig) -> Result<Repositories, StartupError> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Ok(Repositories::in_memory())
    }
}
