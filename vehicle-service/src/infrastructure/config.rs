use std::time::Duration;

use dealer_client::DEFAULT_TIMEOUT;
use dealer_core::config::{HttpSettings, parse_env, required_env};
use dealer_core::pagination::DEFAULT_MAX_LIMIT;
use dealer_core::validation::UpdateMode;

use crate::domain::policy::MutationPolicy;

pub const DEFAULT_PORT: u16 = 3003;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpSettings,
    pub database_url: String,
    pub auth_service_url: String,
    pub verify_timeout: Duration,
    /// `None` disables the verification cache.
    pub verify_cache_ttl: Option<Duration>,
    pub update_mode: UpdateMode,
    pub mutation_policy: MutationPolicy,
    pub max_page_limit: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let timeout_ms: u64 = parse_env(
            "AUTH_VERIFY_TIMEOUT_MS",
            DEFAULT_TIMEOUT.as_millis() as u64,
        )?;
        if timeout_ms == 0 {
            anyhow::bail!("AUTH_VERIFY_TIMEOUT_MS must be positive");
        }
        let cache_ttl_secs: u64 = parse_env("AUTH_VERIFY_CACHE_TTL_SECS", 0)?;
        let max_page_limit = parse_env("MAX_PAGE_LIMIT", DEFAULT_MAX_LIMIT)?;
        if max_page_limit == 0 {
            anyhow::bail!("MAX_PAGE_LIMIT must be positive");
        }

        Ok(Self {
            http: HttpSettings::from_env(DEFAULT_PORT)?,
            database_url: required_env("DATABASE_URL")?,
            auth_service_url: required_env("AUTH_SERVICE_URL")?,
            verify_timeout: Duration::from_millis(timeout_ms),
            verify_cache_ttl: (cache_ttl_secs > 0).then(|| Duration::from_secs(cache_ttl_secs)),
            update_mode: parse_env("VEHICLE_UPDATE_MODE", UpdateMode::Full)?,
            mutation_policy: parse_env("VEHICLE_MUTATION_POLICY", MutationPolicy::OwnerOrAdmin)?,
            max_page_limit,
        })
    }
}
