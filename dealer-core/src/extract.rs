//! Extractor configuration that routes body, query and path failures through
//! [`DomainError`], so every rejection shares one response shape.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::web;

use crate::error::DomainError;

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let message = match &err {
                JsonPayloadError::Deserialize(e) => e.to_string(),
                JsonPayloadError::ContentType => "content type must be application/json".into(),
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    "request body is too large".into()
                }
                _ => "invalid JSON body".into(),
            };
            DomainError::Validation(message).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = match &err {
            QueryPayloadError::Deserialize(e) => e.to_string(),
            _ => "invalid query string".into(),
        };
        DomainError::Validation(message).into()
    })
}

/// A malformed id can never name an existing record.
pub fn path_config(resource: &'static str) -> web::PathConfig {
    web::PathConfig::default().error_handler(move |_err, _req| DomainError::NotFound(resource).into())
}
