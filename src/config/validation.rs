//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect malformed, duplicate and conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, PLACEHOLDER_API_KEY};
use crate::routing::PathPattern;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("app.base_url must start with `/`, got `{0}`")]
    InvalidBaseUrl(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("route #{index}: name must not be empty")]
    EmptyRouteName { index: usize },

    #[error("route `{name}`: {reason}")]
    InvalidRoutePath { name: String, reason: String },

    #[error("route name `{0}` is declared more than once")]
    DuplicateRouteName(String),

    #[error("routes `{first}` and `{second}` share path `{path}`")]
    DuplicateRoutePath {
        path: String,
        first: String,
        second: String,
    },

    #[error("admin.api_key must be changed when the admin API is enabled")]
    PlaceholderApiKey,
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(&mut errors, "observability.metrics_address", &config.observability.metrics_address);
    }
    if config.admin.enabled {
        check_address(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key.is_empty() || config.admin.api_key == PLACEHOLDER_API_KEY {
            errors.push(ValidationError::PlaceholderApiKey);
        }
    }

    if !config.app.base_url.starts_with('/') {
        errors.push(ValidationError::InvalidBaseUrl(config.app.base_url.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.timeouts.view_load_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.view_load_secs"));
    }

    let mut names: HashMap<&str, usize> = HashMap::new();
    let mut paths: HashMap<String, &str> = HashMap::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
            continue;
        }

        let seen = names.entry(route.name.as_str()).or_insert(0);
        *seen += 1;
        if *seen == 2 {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }

        match PathPattern::parse(&route.path) {
            Ok(pattern) => {
                let path = pattern.as_str().to_string();
                if let Some(first) = paths.get(&path) {
                    errors.push(ValidationError::DuplicateRoutePath {
                        path,
                        first: first.to_string(),
                        second: route.name.clone(),
                    });
                } else {
                    paths.insert(path, route.name.as_str());
                }
            }
            Err(e) => errors.push(ValidationError::InvalidRoutePath {
                name: route.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
