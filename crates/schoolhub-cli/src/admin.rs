//! Super-admin management. Super-admins are never created over HTTP.

use anyhow::bail;
use schoolhub_core::{Role, hash_password};
use schoolhub_db::{PrincipalRepository, Store};
use schoolhub_models::principals::Principal;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct SuperAdminInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub login_id: String,
    pub password: String,
}

/// Creates the super-admin. Fails when one already exists.
pub async fn create_super_admin(
    store: &dyn Store,
    input: SuperAdminInput,
    bcrypt_cost: u32,
) -> anyhow::Result<Principal> {
    if let Some(existing) = store.first_super_admin().await? {
        bail!("A super admin already exists (user ID {})", existing.login_id);
    }
    if input.password.len() < MIN_PASSWORD_LENGTH {
        bail!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        );
    }
    if input.login_id.trim().is_empty() {
        bail!("User ID must not be empty");
    }
    if store.email_exists(&input.email, None).await? {
        bail!("Email already in use");
    }

    let password_hash = hash_password(&input.password, bcrypt_cost).map_err(|e| e.error)?;
    let principal = Principal::new(
        Role::SuperAdmin,
        None,
        input.login_id.trim(),
        input.email,
        password_hash,
        input.first_name,
        input.last_name,
    );
    store.insert_principal(&principal).await?;
    Ok(principal)
}

pub async fn find_super_admin(store: &dyn Store) -> anyhow::Result<Option<Principal>> {
    Ok(store.first_super_admin().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_core::verify_password;
    use schoolhub_db::MemoryStore;

    fn input() -> SuperAdminInput {
        SuperAdminInput {
            first_name: "Root".into(),
            last_name: "Admin".into(),
            email: "root@schoolhub.test".into(),
            login_id: "root".into(),
            password: "correct-horse".into(),
        }
    }

    #[tokio::test]
    async fn creates_exactly_one_super_admin() {
        let store = MemoryStore::new();
        let created = create_super_admin(&store, input(), 4).await.unwrap();
        assert_eq!(created.role, Role::SuperAdmin);
        assert!(created.school_id.is_none());
        assert!(verify_password("correct-horse", &created.password_hash).unwrap());

        let second = SuperAdminInput {
            email: "other@schoolhub.test".into(),
            login_id: "other".into(),
            ..input()
        };
        let err = create_super_admin(&store, second, 4).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn rejects_short_passwords() {
        let store = MemoryStore::new();
        let short = SuperAdminInput {
            password: "short".into(),
            ..input()
        };
        assert!(create_super_admin(&store, short, 4).await.is_err());
        assert!(find_super_admin(&store).await.unwrap().is_none());
    }
}
