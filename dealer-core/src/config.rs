//! Environment helpers shared by the service binaries.

use std::str::FromStr;

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;

/// Listener and CORS settings every service reads the same way.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl HttpSettings {
    pub fn from_env(default_port: u16) -> anyhow::Result<Self> {
        Ok(Self {
            host: env_or("HOST", "127.0.0.1"),
            port: parse_env("PORT", default_port)?,
            cors_origins: list_env("CORS_ORIGINS", "*"),
        })
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

pub fn required_env(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("{key} must be set"))
}

pub fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}

pub fn list_env(key: &str, default: &str) -> Vec<String> {
    env_or(key, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    cors = cors.supports_credentials();
    for origin in origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("Permissions-Policy", "geolocation=()"))
        .add(("Cross-Origin-Opener-Policy", "same-origin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_env_falls_back_and_trims() {
        let origins = list_env("DEALER_CORE_TEST_UNSET_ORIGINS", " http://a , ,http://b");
        assert_eq!(origins, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn parse_env_uses_default_when_unset() {
        let port: u16 = parse_env("DEALER_CORE_TEST_UNSET_PORT", 3003).unwrap();
        assert_eq!(port, 3003);
    }

    #[test]
    fn required_env_reports_the_key() {
        let err = required_env("DEALER_CORE_TEST_UNSET_SECRET").unwrap_err();
        assert_eq!(err.to_string(), "DEALER_CORE_TEST_UNSET_SECRET must be set");
    }
}
