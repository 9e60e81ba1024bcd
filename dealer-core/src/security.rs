use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use once_cell::sync::Lazy;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::identity::{Identity, Role, TokenVerifier};

/// Signing material for HS256 tokens. Stateless: verification depends only on
/// the token and the secret.
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    ttl: chrono::Duration,
}

impl JwtKeys {
    pub fn new(secret: String, ttl_secs: i64) -> Self {
        Self {
            secret,
            ttl: chrono::Duration::seconds(ttl_secs),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn generate_token(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: identity.id.to_string(),
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }

    /// Verifies the token and decodes the identity it carries.
    pub fn identity(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let claims = self
            .verify_token(token)
            .map_err(|_| AuthError::InvalidToken)?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(Identity {
            id,
            role: claims.role,
        })
    }
}

#[async_trait]
impl TokenVerifier for JwtKeys {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.identity(token)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    let argon2 = Argon2::default();
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password("dealer-services-dummy").unwrap_or_default());

/// Checks `password` against `hash`, or against a fixed dummy hash when there
/// is no account, so both failure paths cost one argon2 verification.
pub fn verify_password_or_dummy(password: &str, hash: Option<&str>) -> bool {
    match hash {
        Some(hash) => verify_password(password, hash).unwrap_or(false),
        None => {
            let _ = verify_password(password, DUMMY_HASH.as_str());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret".into(), 3600)
    }

    #[test]
    fn token_carries_subject_and_role() {
        let identity = Identity {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let token = keys().generate_token(&identity).unwrap();
        assert_eq!(keys().identity(&token).unwrap(), identity);
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let identity = Identity {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        let token = JwtKeys::new("other".into(), 3600)
            .generate_token(&identity)
            .unwrap();
        assert_eq!(keys().identity(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_invalid() {
        let past = chrono::Utc::now().timestamp() - 3600;
        let token = keys()
            .sign(&Claims {
                sub: Uuid::new_v4().to_string(),
                role: Role::User,
                iat: past - 60,
                exp: past,
            })
            .unwrap();
        assert_eq!(keys().identity(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_and_empty_tokens_are_rejected() {
        assert_eq!(keys().identity("token_invalido"), Err(AuthError::InvalidToken));
        assert_eq!(keys().identity(""), Err(AuthError::MissingToken));
    }

    #[test]
    fn non_uuid_subject_is_invalid() {
        let token = keys()
            .sign(&Claims {
                sub: "42".into(),
                role: Role::User,
                iat: chrono::Utc::now().timestamp(),
                exp: chrono::Utc::now().timestamp() + 60,
            })
            .unwrap();
        assert_eq!(keys().identity(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("senha123").unwrap();
        assert!(verify_password("senha123", &hash).unwrap());
        assert!(!verify_password("senha124", &hash).unwrap());
        assert!(verify_password_or_dummy("senha123", Some(&hash)));
        assert!(!verify_password_or_dummy("senha123", None));
    }
}
