use std::time::Duration;

use async_trait::async_trait;
use dealer_core::{AuthError, Identity, TokenVerifier};
use moka::future::Cache;

pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Remembers successful verifications for a short TTL. Rejections are never
/// cached, so a token that fails once is asked about again next time.
///
/// A cached identity can outlive its token by at most `ttl`.
pub struct CachedVerifier<V> {
    inner: V,
    cache: Cache<String, Identity>,
}

impl<V: TokenVerifier> CachedVerifier<V> {
    pub fn new(inner: V, ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl<V: TokenVerifier> TokenVerifier for CachedVerifier<V> {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if let Some(identity) = self.cache.get(token).await {
            return Ok(identity);
        }
        let identity = self.inner.verify(token).await?;
        self.cache.insert(token.to_string(), identity).await;
        Ok(identity)
    }
}
