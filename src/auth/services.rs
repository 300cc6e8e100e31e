use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{
    claims::IdentityClaims,
    roles::{email_to_role, Role, RolePolicy},
};
use crate::{
    error::{AppError, AppResult},
    users::{
        repo::UserRepo,
        repo_types::{IdentityUpsert, User},
    },
};

/// Turns verified claims into the request's principal.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, claims: &IdentityClaims) -> AppResult<User>;
}

/// Derives the role with a [`RolePolicy`] and upserts the user on every
/// authentication, so email/name/role always reflect the latest token.
pub struct UpsertResolver {
    policy: RolePolicy,
    users: Arc<dyn UserRepo>,
}

impl UpsertResolver {
    pub fn new(policy: RolePolicy, users: Arc<dyn UserRepo>) -> Self {
        Self { policy, users }
    }
}

#[async_trait]
impl PrincipalResolver for UpsertResolver {
    async fn resolve(&self, claims: &IdentityClaims) -> AppResult<User> {
        let role = email_to_role(&self.policy, &claims.email);
        if role == Role::Blocked {
            warn!(email = %claims.email, "email outside institution rejected");
            return Err(AppError::forbidden(
                "Akses ditolak: harap gunakan email institusi",
            ));
        }

        let user = self
            .users
            .upsert_identity(IdentityUpsert {
                id: &claims.subject,
                email: &claims.email,
                name: &claims.name,
                role,
            })
            .await
            .map_err(AppError::store("Gagal memuat data pengguna"))?;
        debug!(user_id = %user.id, role = ?user.role, "principal resolved");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    fn claims(sub: &str, email: &str, name: &str) -> IdentityClaims {
        IdentityClaims {
            subject: sub.into(),
            email: email.into(),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn first_login_creates_user_with_empty_prodi() {
        let store = Arc::new(MemoryStore::default());
        let resolver = UpsertResolver::new(RolePolicy::default(), store.clone());

        let user = resolver.resolve(&claims("s1", "a@mail.ugm.ac.id", "Dr. A")).await.unwrap();
        assert_eq!(user.role, Role::Faculty);
        assert_eq!(user.prodi, None);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn repeated_login_is_idempotent_and_last_claims_win() {
        let store = Arc::new(MemoryStore::default());
        let resolver = UpsertResolver::new(RolePolicy::default(), store.clone());

        let first = resolver.resolve(&claims("s1", "a@gmail.com", "Budi")).await.unwrap();
        let again = resolver.resolve(&claims("s1", "a@gmail.com", "Budi")).await.unwrap();
        assert_eq!(first, again);

        let renamed = resolver
            .resolve(&claims("s1", "a@mail.ugm.ac.id", "Budi S."))
            .await
            .unwrap();
        assert_eq!(renamed.email, "a@mail.ugm.ac.id");
        assert_eq!(renamed.name, "Budi S.");
        assert_eq!(renamed.role, Role::Faculty);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn upsert_keeps_prodi() {
        let store = Arc::new(MemoryStore::default());
        let resolver = UpsertResolver::new(RolePolicy::default(), store.clone());
        resolver.resolve(&claims("s1", "a@gmail.com", "Budi")).await.unwrap();
        store.update_prodi("s1", "Ilmu Komputer").await.unwrap();

        let user = resolver.resolve(&claims("s1", "a@gmail.com", "Budi")).await.unwrap();
        assert_eq!(user.prodi.as_deref(), Some("Ilmu Komputer"));
    }

    #[tokio::test]
    async fn blocked_email_is_forbidden_without_write() {
        let store = Arc::new(MemoryStore::default());
        let policy = RolePolicy {
            restrict_to_institution: true,
            ..RolePolicy::default()
        };
        let resolver = UpsertResolver::new(policy, store.clone());

        let err = resolver.resolve(&claims("s1", "a@gmail.com", "Budi")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(store.user_count(), 0);
    }
}
