use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{IdentityUpsert, User};

/// Persistence of [`User`] records.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Creates the user or overwrites email/name/role of an existing one.
    /// `prodi` is left untouched on update and empty on insert.
    async fn upsert_identity(&self, identity: IdentityUpsert<'_>) -> sqlx::Result<User>;

    /// Fails with `RowNotFound` when the user does not exist.
    async fn update_profile(&self, id: &str, name: &str, prodi: Option<&str>) -> sqlx::Result<User>;

    /// Fails with `RowNotFound` when the user does not exist.
    async fn update_prodi(&self, id: &str, prodi: &str) -> sqlx::Result<User>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn upsert_identity(&self, identity: IdentityUpsert<'_>) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
               SET email = EXCLUDED.email,
                   name = EXCLUDED.name,
                   role = EXCLUDED.role
            RETURNING id, email, name, role, prodi
            "#,
        )
        .bind(identity.id)
        .bind(identity.email)
        .bind(identity.name)
        .bind(identity.role)
        .fetch_one(&self.db)
        .await
    }

    async fn update_profile(&self, id: &str, name: &str, prodi: Option<&str>) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = $2, prodi = $3
             WHERE id = $1
            RETURNING id, email, name, role, prodi
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(prodi)
        .fetch_one(&self.db)
        .await
    }

    async fn update_prodi(&self, id: &str, prodi: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET prodi = $2
             WHERE id = $1
            RETURNING id, email, name, role, prodi
            "#,
        )
        .bind(id)
        .bind(prodi)
        .fetch_one(&self.db)
        .await
    }
}
