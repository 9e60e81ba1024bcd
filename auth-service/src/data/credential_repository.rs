use async_trait::async_trait;
use dealer_core::DomainError;
use sqlx::PgPool;
use tracing::error;

use crate::domain::credential::Credential;

#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, DomainError> {
        sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find credential by email: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryCredentialRepository;

#[cfg(any(test, feature = "test-support"))]
mod memory {
    use std::sync::Mutex;

    use chrono::Utc;
    use dealer_core::security::hash_password;
    use dealer_core::Role;
    use uuid::Uuid;

    use super::*;

    /// Credential store backed by a vector, for tests without PostgreSQL.
    #[derive(Default)]
    pub struct InMemoryCredentialRepository {
        rows: Mutex<Vec<Credential>>,
    }

    impl InMemoryCredentialRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds an account and returns it; the password is hashed like the user service does.
        pub fn insert(&self, name: &str, email: &str, password: &str, role: Role) -> Credential {
            let now = Utc::now();
            let credential = Credential {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_lowercase(),
                password_hash: hash_password(password).expect("hash test password"),
                role,
                created_at: now,
                updated_at: now,
            };
            self.rows
                .lock()
                .expect("credential store poisoned")
                .push(credential.clone());
            credential
        }
    }

    #[async_trait]
    impl CredentialRepository for InMemoryCredentialRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, DomainError> {
            let rows = self
                .rows
                .lock()
                .map_err(|_| DomainError::Internal("credential store poisoned".into()))?;
            Ok(rows.iter().find(|c| c.email == email).cloned())
        }
    }
}
