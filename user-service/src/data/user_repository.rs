use async_trait::async_trait;
use chrono::Utc;
use dealer_core::DomainError;
use dealer_core::pagination::PageRequest;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::user::{User, UserChanges};

pub const EMAIL_TAKEN: &str = "email already registered";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` if the email is already stored.
    async fn create(&self, user: User) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn email_taken(&self, email: &str, excluding: Option<Uuid>) -> Result<bool, DomainError>;
    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, DomainError>;
    async fn count(&self) -> Result<u64, DomainError>;
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DomainError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn write_error(op: &str, e: sqlx::Error) -> DomainError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        return DomainError::conflict(EMAIL_TAKEN);
    }
    error!("failed to {} user: {}", op, e);
    DomainError::Internal(format!("database error: {}", e))
}

fn read_error(op: &str, e: sqlx::Error) -> DomainError {
    error!("db error {}: {}", op, e);
    DomainError::Internal(format!("database error: {}", e))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let stored = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create", e))?;

        info!(user_id = %stored.id, email = %stored.email, "user created");
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error("find_by_id", e))
    }

    async fn email_taken(&self, email: &str, excluding: Option<Uuid>) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| read_error("email_taken", e))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error("list", e))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error("count", e))?;
        Ok(total.max(0) as u64)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DomainError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                name = COALESCE($1, name),
                email = COALESCE($2, email),
                updated_at = $3
            WHERE id = $4
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(changes.name)
        .bind(changes.email)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("update", e))?;

        if user.is_some() {
            info!(user_id = %id, "user updated");
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| read_error("delete", e))?;

        if deleted.rows_affected() > 0 {
            info!(user_id = %id, "user deleted");
        }
        Ok(deleted.rows_affected() > 0)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryUserRepository;

#[cfg(any(test, feature = "test-support"))]
mod memory {
    use std::sync::{Mutex, MutexGuard};

    use dealer_core::pagination::page_slice;

    use super::*;

    /// Vector-backed store. Uniqueness is checked under the same lock as the
    /// write, like the database constraint it stands in for.
    #[derive(Default)]
    pub struct InMemoryUserRepository {
        rows: Mutex<Vec<User>>,
    }

    impl InMemoryUserRepository {
        pub fn new() -> Self {
            Self::default()
        }

        fn rows(&self) -> Result<MutexGuard<'_, Vec<User>>, DomainError> {
            self.rows
                .lock()
                .map_err(|_| DomainError::Internal("user store poisoned".into()))
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn create(&self, user: User) -> Result<User, DomainError> {
            let mut rows = self.rows()?;
            if rows.iter().any(|u| u.email == user.email) {
                return Err(DomainError::conflict(EMAIL_TAKEN));
            }
            rows.push(user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
            Ok(self.rows()?.iter().find(|u| u.id == id).cloned())
        }

        async fn email_taken(
            &self,
            email: &str,
            excluding: Option<Uuid>,
        ) -> Result<bool, DomainError> {
            Ok(self
                .rows()?
                .iter()
                .any(|u| u.email == email && Some(u.id) != excluding))
        }

        async fn list(&self, page: PageRequest) -> Result<Vec<User>, DomainError> {
            let mut rows = self.rows()?.clone();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(page_slice(&rows, page))
        }

        async fn count(&self) -> Result<u64, DomainError> {
            Ok(self.rows()?.len() as u64)
        }

        async fn update(
            &self,
            id: Uuid,
            changes: UserChanges,
        ) -> Result<Option<User>, DomainError> {
            let mut rows = self.rows()?;
            if let Some(email) = &changes.email {
                if rows.iter().any(|u| &u.email == email && u.id != id) {
                    return Err(DomainError::conflict(EMAIL_TAKEN));
                }
            }
            let Some(user) = rows.iter_mut().find(|u| u.id == id) else {
                return Ok(None);
            };
            if let Some(name) = changes.name {
                user.name = name;
            }
            if let Some(email) = changes.email {
                user.email = email;
            }
            user.updated_at = Utc::now();
            Ok(Some(user.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
            let mut rows = self.rows()?;
            let before = rows.len();
            rows.retain(|u| u.id != id);
            Ok(rows.len() < before)
        }
    }
}
