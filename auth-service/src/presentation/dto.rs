use dealer_core::{Identity, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::credential::Credential;

/// Both fields are optional so that their absence is reported as a domain
/// error rather than a deserialisation failure.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&Credential> for UserSummary {
    fn from(c: &Credential) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            email: c.email.clone(),
            role: c.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user: Identity,
}
