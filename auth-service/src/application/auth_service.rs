use std::sync::Arc;

use dealer_core::security::{JwtKeys, verify_password_or_dummy};
use dealer_core::{AuthError, DomainError, Identity};
use tracing::{info, instrument, warn};

use crate::data::credential_repository::CredentialRepository;
use crate::domain::credential::Credential;

/// Issues tokens on login and verifies them. Holds no session state.
#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn CredentialRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn CredentialRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Unknown email and wrong password are indistinguishable to the caller,
    /// both in the error returned and in the hashing work performed.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<(String, Credential), DomainError> {
        let (email, password) = match (non_empty(email), non_empty(password)) {
            (Some(email), Some(password)) => (email.to_lowercase(), password),
            _ => return Err(AuthError::MissingField.into()),
        };

        let credential = self.repo.find_by_email(&email).await?;
        let hash = credential.as_ref().map(|c| c.password_hash.as_str());
        if !verify_password_or_dummy(password, hash) {
            warn!("login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        let Some(credential) = credential else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let token = self
            .keys
            .generate_token(&credential.identity())
            .map_err(|err| DomainError::Internal(err.to_string()))?;

        info!(user_id = %credential.id, "token issued");
        Ok((token, credential))
    }

    pub fn verify(&self, token: Option<&str>) -> Result<Identity, DomainError> {
        let token = non_empty(token).ok_or(AuthError::MissingToken)?;
        Ok(self.keys.identity(token)?)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
