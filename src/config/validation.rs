//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check name table targets are content paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::content::ContentPath;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    let hosts = config
        .gateway
        .subdomain_hosts
        .iter()
        .map(|h| ("gateway.subdomain_hosts", h))
        .chain(
            config
                .gateway
                .name_linked_hosts
                .iter()
                .map(|h| ("gateway.name_linked_hosts", h)),
        );
    for (field, host) in hosts {
        if host.is_empty() || host.contains(['/', ':', ' ']) {
            errors.push(ValidationError::new(field, format!("{:?} is not a host name", host)));
        }
    }

    if config.store.root.is_empty() {
        errors.push(ValidationError::new("store.root", "must not be empty"));
    }
    for (label, target) in &config.store.names {
        if let Err(e) = ContentPath::parse(target) {
            errors.push(ValidationError::new(format!("store.names.{}", label), e.to_string()));
        }
    }

    if config.redirects.max_file_bytes == 0 {
        errors.push(ValidationError::new("redirects.max_file_bytes", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
