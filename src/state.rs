use std::sync::Arc;

use anyhow::Context;
use schoolhub_config::{
    AttendanceConfig, CorsConfig, EmailConfig, JwtConfig, PasswordConfig, RateLimitConfig,
    ServerConfig, StoreBackend, UploadConfig,
};
use schoolhub_db::{MemoryStore, PgStore, Store, init_db_pool, run_migrations};
use tracing::info;

use crate::middleware::rate_limit::RateLimiters;
use crate::utils::email::{Notifier, build_notifier};
use crate::utils::uploads::ImageStorage;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub attendance_config: AttendanceConfig,
    pub password_config: PasswordConfig,
    pub upload_config: UploadConfig,
    pub notifier: Arc<dyn Notifier>,
    pub images: ImageStorage,
    pub limiters: RateLimiters,
}

impl AppState {
    /// State with default settings around `store`. Email is logged instead
    /// of sent and rate limiting is off.
    pub fn new(store: Arc<dyn Store>, jwt_config: JwtConfig) -> Self {
        let email_config = EmailConfig::default();
        let rate_limit_config = RateLimitConfig::default();
        let upload_config = UploadConfig::default();
        Self {
            store,
            jwt_config,
            notifier: build_notifier(&email_config),
            email_config,
            cors_config: CorsConfig::default(),
            limiters: RateLimiters::new(&rate_limit_config),
            rate_limit_config,
            attendance_config: AttendanceConfig::default(),
            password_config: PasswordConfig::default(),
            images: ImageStorage::new(&upload_config),
            upload_config,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_attendance_config(mut self, config: AttendanceConfig) -> Self {
        self.attendance_config = config;
        self
    }

    pub fn with_password_config(mut self, config: PasswordConfig) -> Self {
        self.password_config = config;
        self
    }

    pub fn with_rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.limiters = RateLimiters::new(&config);
        self.rate_limit_config = config;
        self
    }

    pub fn with_upload_config(mut self, config: UploadConfig) -> Self {
        self.images = ImageStorage::new(&config);
        self.upload_config = config;
        self
    }
}

/// Opens the configured storage backend. Postgres is migrated on the way up.
pub async fn init_store(server: &ServerConfig) -> anyhow::Result<Arc<dyn Store>> {
    match server.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = server
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;
            let pool = init_db_pool(url, server.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Connected to Postgres, migrations applied");
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

/// Builds the state from the environment. Fails without `JWT_SECRET`.
pub async fn init_app_state(server: &ServerConfig) -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env().context("Invalid token configuration")?;
    let email_config = EmailConfig::from_env();
    let rate_limit_config = RateLimitConfig::from_env();
    let upload_config = UploadConfig::from_env();

    Ok(AppState {
        store: init_store(server).await?,
        jwt_config,
        notifier: build_notifier(&email_config),
        email_config,
        cors_config: CorsConfig::from_env(),
        limiters: RateLimiters::new(&rate_limit_config),
        rate_limit_config,
        attendance_config: AttendanceConfig::from_env()?,
        password_config: PasswordConfig::from_env(),
        images: ImageStorage::new(&upload_config),
        upload_config,
    })
}
