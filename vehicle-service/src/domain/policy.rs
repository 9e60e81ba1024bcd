use std::str::FromStr;

use dealer_core::{DomainError, Identity};
use uuid::Uuid;

/// Who may update or delete a vehicle once it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPolicy {
    /// The creator or any admin.
    #[default]
    OwnerOrAdmin,
    /// Any caller holding a verified token.
    AnyAuthenticated,
}

impl MutationPolicy {
    pub fn authorize(&self, identity: &Identity, created_by: Uuid) -> Result<(), DomainError> {
        match self {
            MutationPolicy::AnyAuthenticated => Ok(()),
            MutationPolicy::OwnerOrAdmin if identity.is_admin() || identity.id == created_by => {
                Ok(())
            }
            MutationPolicy::OwnerOrAdmin => Err(DomainError::Forbidden),
        }
    }
}

impl FromStr for MutationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner_or_admin" => Ok(MutationPolicy::OwnerOrAdmin),
            "any_authenticated" => Ok(MutationPolicy::AnyAuthenticated),
            other => Err(format!(
                "unknown mutation policy {other:?}, expected owner_or_admin or any_authenticated"
            )),
        }
    }
}
