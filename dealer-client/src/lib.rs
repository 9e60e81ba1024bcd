//! Client side of the inter-service token-verification protocol.

mod cache;
mod error;
mod http_client;

pub use cache::{CachedVerifier, DEFAULT_MAX_ENTRIES};
pub use error::ClientError;
pub use http_client::{AuthClientHttp, DEFAULT_TIMEOUT};
