//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, sizes and the store connection string
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FormRelayConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use crate::config::schema::FormRelayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("store.uri: unsupported scheme in '{0}'")]
    UnsupportedStore(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &FormRelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "http.bind_address", &config.http.bind_address);
    check_address(&mut errors, "relay.bind_address", &config.relay.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.http_metrics_address",
            &config.observability.http_metrics_address,
        );
        check_address(
            &mut errors,
            "observability.relay_metrics_address",
            &config.observability.relay_metrics_address,
        );
    }

    if config.http.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "http.max_body_size" });
    }
    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "http.request_timeout_secs" });
    }
    if config.relay.buffer_size == 0 {
        errors.push(ValidationError::Zero { field: "relay.buffer_size" });
    }

    if config.http.web_root.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "http.web_root" });
    }
    if config.store.database.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "store.database" });
    }
    if config.store.collection.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "store.collection" });
    }

    let uri = config.store.uri.as_str();
    if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") || uri.starts_with("memory://")) {
        errors.push(ValidationError::UnsupportedStore(uri.to_string()));
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
