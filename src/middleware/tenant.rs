use anyhow::anyhow;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use schoolhub_core::{AppError, Role};
use schoolhub_db::TenantStore;
use schoolhub_models::SchoolId;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// `?schoolId=` on tenant scoped routes. Only super-admins need it; the value
/// is ignored for everyone else.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SchoolScopeQuery {
    pub school_id: Option<SchoolId>,
}

/// Store handle pinned to the school of the authenticated principal.
///
/// Handlers take this instead of the raw store for anything that belongs to
/// a school.
pub struct Tenant(pub TenantStore);

impl FromRequestParts<AppState> for Tenant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let scope = Query::<SchoolScopeQuery>::from_request_parts(parts, state)
            .await
            .map(|Query(scope)| scope)
            .unwrap_or_default();

        let tenant = TenantStore::for_principal(state.store.clone(), &auth_user.0, scope.school_id)?;

        // A super-admin names the school; it has to exist and still be active.
        if auth_user.0.role == Role::SuperAdmin {
            tenant
                .school()
                .await?
                .filter(|school| school.is_active)
                .ok_or_else(|| AppError::not_found(anyhow!("School not found")))?;
        }

        Ok(Tenant(tenant))
    }
}
