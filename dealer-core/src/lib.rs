//! Building blocks shared by the auth, user and vehicle services: the error
//! taxonomy and its HTTP mapping, identities and the token-verification seam,
//! validation, pagination, and the ambient HTTP plumbing.

pub mod config;
pub mod error;
pub mod extract;
pub mod health;
pub mod identity;
pub mod logging;
pub mod middleware;
pub mod pagination;
pub mod security;
pub mod validation;

pub use error::{AuthError, DomainError};
pub use identity::{Identity, Role, TokenVerifier};
