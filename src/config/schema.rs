//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Host-to-content mapping.
    pub gateway: HostConfig,

    /// Content store location and name table.
    pub store: StoreConfig,

    /// `_redirects` processing and not-found fallbacks.
    pub redirects: RedirectsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Which hosts give a request its own origin.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    /// Parent domains of the subdomain gateway: `{root}.ipfs.{host}`.
    pub subdomain_hosts: Vec<String>,

    /// Hosts served as `/ipns/{host}`.
    pub name_linked_hosts: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            subdomain_hosts: vec!["localhost".to_string()],
            name_linked_hosts: Vec::new(),
        }
    }
}

/// Content store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding `ipfs/{id}/...` trees.
    pub root: String,

    /// Treat unknown names as unresolvable without network access.
    pub offline: bool,

    /// Name label → content path (e.g. "example.com" = "/ipfs/bafy...").
    pub names: BTreeMap<String, String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: "./content".to_string(),
            offline: false,
            names: BTreeMap::new(),
        }
    }
}

/// Fallback pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RedirectsConfig {
    /// Consult `_redirects` on isolated origins.
    pub enabled: bool,

    /// Largest rules file accepted, in bytes.
    pub max_file_bytes: usize,

    /// Let name-linked hosts without an inner identifier use the rules file
    /// found under the mutable name.
    pub bare_name_links: bool,

    /// Search parent directories for `ipfs-404.html`.
    pub pretty_404: bool,
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_file_bytes: 64 * 1024,
            bare_name_links: false,
            pretty_404: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
