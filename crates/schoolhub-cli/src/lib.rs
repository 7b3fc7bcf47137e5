//! # SchoolHub CLI
//!
//! Administration and seeding utilities. Everything here writes through the
//! [`Store`] trait, so the same code runs against Postgres or the in-memory
//! backend.
//!
//! ## Usage
//!
//! ```ignore
//! use schoolhub_cli::seeder::{SeedConfig, seed};
//!
//! let store = schoolhub_cli::open_store(&server).await?;
//! seed(store.as_ref(), &SeedConfig::new(3), "password123", 10).await?;
//! ```

use std::sync::Arc;

use anyhow::Context;
use schoolhub_config::{ServerConfig, StoreBackend};
use schoolhub_db::{MemoryStore, PgStore, Store, init_db_pool, run_migrations};

pub mod admin;
pub mod seeder;

/// Opens the backend named by `STORE_BACKEND`. Postgres is migrated first.
pub async fn open_store(server: &ServerConfig) -> anyhow::Result<Arc<dyn Store>> {
    match server.store_backend {
        StoreBackend::Memory => {
            println!("⚠️  Using the in-memory store; nothing is persisted after exit.");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = server
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = init_db_pool(url, 5)
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
