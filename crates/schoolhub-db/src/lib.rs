//! # SchoolHub DB
//!
//! Storage layer for the SchoolHub API.
//!
//! - [`Store`]: the repository traits every backend implements.
//! - [`TenantStore`]: a store handle pinned to one school; the only way
//!   request handlers reach tenant-scoped data.
//! - [`PgStore`]: Postgres via `sqlx`, with embedded migrations.
//! - [`MemoryStore`]: a lock-guarded in-memory backend for tests and demos.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use schoolhub_db::{PgStore, Store, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url, 10).await?;
//! run_migrations(&pool).await?;
//! let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod scope;
pub mod store;

pub use error::{Duplicate, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::{PgStore, init_db_pool, run_migrations};
pub use scope::{ScopeError, TenantStore, resolve_school};
pub use store::{
    AttendanceRepository, ClassRepository, FeeRepository, PrincipalRepository, SchoolRepository,
    StatsRepository, Store, TimetableRepository,
};

pub use sqlx::PgPool;
