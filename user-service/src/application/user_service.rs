use std::sync::Arc;

use dealer_core::DomainError;
use dealer_core::pagination::{PageRequest, Pagination};
use dealer_core::security::hash_password;
use dealer_core::validation::{UpdateMode, validate_full, validate_update};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::data::user_repository::{EMAIL_TAKEN, UserRepository};
use crate::domain::user::{User, UserChanges};
use crate::presentation::dto::{CreateUserRequest, UpdateUserRequest};

pub const EMAIL_TAKEN_BY_OTHER: &str = "email already registered to another user";

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    update_mode: UpdateMode,
    max_page_limit: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, max_page_limit: u32) -> Self {
        Self {
            repo,
            update_mode: UpdateMode::Partial,
            max_page_limit,
        }
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub fn max_page_limit(&self) -> u32 {
        self.max_page_limit
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateUserRequest) -> Result<User, DomainError> {
        validate_full(&input)?;
        let (Some(name), Some(email), Some(password)) = (input.name, input.email, input.password)
        else {
            return Err(DomainError::validation("name, email and password are required"));
        };
        let email = email.to_lowercase();

        if self.repo.email_taken(&email, None).await? {
            return Err(DomainError::conflict(EMAIL_TAKEN));
        }

        let password_hash =
            hash_password(&password).map_err(|e| DomainError::Internal(e.to_string()))?;
        let user = User::new(name, email, password_hash, input.role.unwrap_or_default());
        self.repo.create(user).await
    }

    pub async fn list(&self, page: PageRequest) -> Result<(Vec<User>, Pagination), DomainError> {
        let users = self.repo.list(page).await?;
        let total = self.repo.count().await?;
        Ok((users, Pagination::new(page, total)))
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound("user"))
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateUserRequest) -> Result<User, DomainError> {
        validate_update(&input, self.update_mode)?;
        self.get(id).await?;

        let email = input.email.map(|e| e.to_lowercase());
        if let Some(email) = &email {
            if self.repo.email_taken(email, Some(id)).await? {
                return Err(DomainError::conflict(EMAIL_TAKEN_BY_OTHER));
            }
        }

        let changes = UserChanges {
            name: input.name,
            email,
        };
        self.repo
            .update(id, changes)
            .await?
            .ok_or(DomainError::NotFound("user"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::NotFound("user"));
        }
        info!(user_id = %id, "user removed");
        Ok(())
    }
}
