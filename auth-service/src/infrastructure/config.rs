use dealer_core::config::{HttpSettings, parse_env, required_env};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpSettings,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_ttl_secs = parse_env("JWT_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if jwt_ttl_secs <= 0 {
            anyhow::bail!("JWT_TTL_SECS must be positive");
        }

        Ok(Self {
            http: HttpSettings::from_env(DEFAULT_PORT)?,
            database_url: required_env("DATABASE_URL")?,
            jwt_secret: required_env("JWT_SECRET")?,
            jwt_ttl_secs,
        })
    }
}
