use chrono::Utc;
use schoolhub_core::AppError;
use schoolhub_db::{Store, TenantStore};
use schoolhub_models::stats::{PlatformStats, SchoolStats};
use tracing::instrument;

pub struct StatsService;

impl StatsService {
    /// Counters for the admin dashboard. Attendance counts today's records.
    #[instrument(skip(tenant), fields(school.id = %tenant.school_id()))]
    pub async fn school_stats(tenant: &TenantStore) -> Result<SchoolStats, AppError> {
        let today = Utc::now().date_naive();
        Ok(tenant.stats(today).await?)
    }

    #[instrument(skip(store))]
    pub async fn platform_stats(store: &dyn Store) -> Result<PlatformStats, AppError> {
        Ok(store.platform_stats().await?)
    }
}
