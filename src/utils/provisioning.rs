//! Credential provisioning for new principals.
//!
//! A provisioned principal gets a generated login id that is unique within
//! its school and a one-time random password. Only the bcrypt hash is stored.
//! The plain credentials go back to the caller once and to the principal by
//! notification; a failed notification never undoes the write.

use std::sync::Arc;

use schoolhub_core::credentials::{LoginIdKind, generate_login_id, generate_password};
use schoolhub_core::{AppError, hash_password};
use schoolhub_db::{Duplicate, Store, StoreError, TenantStore};
use schoolhub_models::principals::{IssuedCredentials, Principal};
use schoolhub_models::schools::School;
use tracing::{debug, info, instrument, warn};

use crate::metrics::{track_notification_failed, track_principal_provisioned};
use crate::utils::email::{CredentialNotice, Notifier};

pub const MAX_LOGIN_ID_ATTEMPTS: usize = 10;

/// Where a provisioned principal is written.
pub enum Destination<'a> {
    /// An existing school, through its scoped handle.
    School(&'a TenantStore),
    /// A school being registered; school and admin are written together.
    NewSchool {
        store: &'a dyn Store,
        school: &'a School,
    },
}

impl Destination<'_> {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        match self {
            Destination::School(tenant) => tenant.email_exists(email, None).await,
            Destination::NewSchool { store, .. } => store.email_exists(email, None).await,
        }
    }

    async fn login_id_exists(&self, login_id: &str) -> Result<bool, StoreError> {
        match self {
            Destination::School(tenant) => tenant.login_id_exists(login_id).await,
            Destination::NewSchool { store, school } => {
                store
                    .login_id_exists(Some(&school.school_id), login_id)
                    .await
            }
        }
    }

    async fn write(&self, principal: Principal) -> Result<Principal, StoreError> {
        match self {
            Destination::School(tenant) => tenant.insert_principal(principal).await,
            Destination::NewSchool { store, school } => {
                let mut principal = principal;
                principal.school_id = Some(school.school_id.clone());
                store.insert_school_with_admin(school, &principal).await?;
                Ok(principal)
            }
        }
    }
}

/// Writes `principal` with fresh credentials.
///
/// The email is checked first so a duplicate fails before anything is
/// written. Login ids are drawn until one is free; a collision reported by
/// the store itself (a concurrent insert won the race) also draws again.
#[instrument(skip(destination, principal, bcrypt_cost), fields(role = principal.role.as_str()))]
pub async fn provision(
    destination: Destination<'_>,
    mut principal: Principal,
    kind: LoginIdKind,
    bcrypt_cost: u32,
) -> Result<(Principal, IssuedCredentials), AppError> {
    if destination.email_exists(&principal.email).await? {
        warn!(email = %principal.email, "Provisioning rejected, email in use");
        return Err(StoreError::Conflict(Duplicate::Email).into());
    }

    let password = generate_password();
    principal.password_hash = hash_password(&password, bcrypt_cost)?;

    for attempt in 1..=MAX_LOGIN_ID_ATTEMPTS {
        let login_id = generate_login_id(kind);
        if destination.login_id_exists(&login_id).await? {
            debug!(attempt, "Generated user ID taken, retrying");
            continue;
        }

        principal.login_id = login_id;
        match destination.write(principal.clone()).await {
            Ok(saved) => {
                track_principal_provisioned(saved.role);
                info!(
                    principal.id = %saved.id,
                    school.id = ?saved.school_id,
                    attempt,
                    "Principal provisioned"
                );
                let credentials = IssuedCredentials {
                    user_id: saved.login_id.clone(),
                    password,
                };
                return Ok((saved, credentials));
            }
            Err(e) if e.is_conflict(Duplicate::LoginId) => {
                debug!(attempt, "User ID taken concurrently, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::internal_error(
        "Could not allocate a unique user ID",
    ))
}

/// Sends the credential notice on a background task.
pub fn dispatch_credentials(notifier: Arc<dyn Notifier>, notice: CredentialNotice) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send_credentials(&notice).await {
            track_notification_failed();
            warn!(
                to = %notice.to,
                login_id = %notice.login_id,
                error = %e,
                "Credential notification failed"
            );
        }
    });
}

pub fn credential_notice(
    principal: &Principal,
    credentials: &IssuedCredentials,
    school_name: &str,
) -> CredentialNotice {
    CredentialNotice {
        to: principal.email.clone(),
        name: principal.full_name(),
        login_id: credentials.user_id.clone(),
        password: credentials.password.clone(),
        school_name: school_name.to_string(),
        role: principal.role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_core::{Role, verify_password};
    use schoolhub_db::MemoryStore;
    use schoolhub_models::SchoolId;

    fn teacher(email: &str) -> Principal {
        Principal::new(Role::Teacher, None, "", email, "", "Grace", "Hopper")
    }

    #[tokio::test]
    async fn issues_teacher_credentials() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let tenant = TenantStore::new(store, SchoolId::new("GF-01"));

        let (saved, creds) = provision(
            Destination::School(&tenant),
            teacher("t@gf.test"),
            LoginIdKind::Teacher,
            4,
        )
        .await
        .unwrap();

        assert_eq!(saved.school_id, Some(SchoolId::new("GF-01")));
        assert_eq!(creds.user_id.len(), 5);
        assert_eq!(saved.login_id, creds.user_id);
        assert!(verify_password(&creds.password, &saved.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_writes_nothing() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let tenant = TenantStore::new(store, SchoolId::new("GF-01"));
        provision(
            Destination::School(&tenant),
            teacher("dup@gf.test"),
            LoginIdKind::Teacher,
            4,
        )
        .await
        .unwrap();

        let err = provision(
            Destination::School(&tenant),
            teacher("dup@gf.test"),
            LoginIdKind::Teacher,
            4,
        )
        .await
        .unwrap_err();

        assert_eq!(err.status.as_u16(), 409);
        assert_eq!(tenant.list_principals(Role::Teacher).await.unwrap().len(), 1);
    }
}
