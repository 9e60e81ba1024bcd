use dealer_core::config::{HttpSettings, parse_env, required_env};
use dealer_core::pagination::DEFAULT_MAX_LIMIT;

pub const DEFAULT_PORT: u16 = 3002;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpSettings,
    pub database_url: String,
    pub max_page_limit: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let max_page_limit = parse_env("MAX_PAGE_LIMIT", DEFAULT_MAX_LIMIT)?;
        if max_page_limit == 0 {
            anyhow::bail!("MAX_PAGE_LIMIT must be positive");
        }

        Ok(Self {
            http: HttpSettings::from_env(DEFAULT_PORT)?,
            database_url: required_env("DATABASE_URL")?,
            max_page_limit,
        })
    }
}
