use std::sync::Arc;
use std::time::Duration;

use dealer_client::{AuthClientHttp, CachedVerifier, ClientError, DEFAULT_MAX_ENTRIES};
use dealer_core::TokenVerifier;
use tracing::info;

/// Builds the verifier the auth gate calls, wrapped in a cache when a TTL is
/// configured.
pub fn build_verifier(
    auth_service_url: &str,
    timeout: Duration,
    cache_ttl: Option<Duration>,
) -> Result<Arc<dyn TokenVerifier>, ClientError> {
    let client = AuthClientHttp::new(auth_service_url, timeout)?;
    info!(
        auth_service = client.base_url(),
        timeout_ms = timeout.as_millis() as u64,
        "auth client ready"
    );

    Ok(match cache_ttl {
        Some(ttl) => {
            info!(ttl_secs = ttl.as_secs(), "verification cache enabled");
            Arc::new(CachedVerifier::new(client, ttl, DEFAULT_MAX_ENTRIES))
        }
        None => Arc::new(client),
    })
}
